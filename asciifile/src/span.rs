//! # Input File Ranges
//!
//! A `Span` is equivalent to a slice of the input file annotated with
//! line and column of start and end indices. It is immutable, mutations
//! return a new instance.
//!
//! The range defined by the start and end position of a `Span` is inclusive
//! on both sides. As a result, `as_str()` contains the character pointed at
//! by the start position and the character pointed to by the end position.
//! This is not equivalent to rusts behaviour on slices (`low..high`). By
//! including the upper bound, we do not have to generate a fake
//! `EOF`-Position beyond the real end of input to create a `Span` that
//! contains the last character of the input file. This also means that you
//! cannot create an empty `Span`.
use crate::Position;
use std::{
    cmp::{max, min},
    fmt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'f> {
    /// position of the first char in the span.
    start: Position<'f>,
    /// position of the last char in the span.
    end: Position<'f>,
}

impl<'f> Span<'f> {
    pub fn new(a: Position<'f>, b: Position<'f>) -> Self {
        Self {
            start: min(a, b),
            end: max(a, b),
        }
    }

    /// Creates a span containing only the given position
    ///
    /// ```
    /// use asciifile::{AsciiFile, Span};
    ///
    /// let file = AsciiFile::new(b"ABCD").unwrap();
    /// let position = file.iter().nth(2).unwrap();
    /// let span = Span::from_single_position(position);
    /// assert_eq!("C", span.as_str());
    /// ```
    pub fn from_single_position(position: Position<'f>) -> Self {
        Span {
            start: position,
            end: position,
        }
    }

    /// Creates the smallest span containing all given positions.
    ///
    /// ```
    /// use asciifile::{AsciiFile, Span};
    ///
    /// let file = AsciiFile::new(b"abcdfeghAAA").unwrap();
    ///
    /// let positions = file
    ///     .iter()
    ///     .take_while(|position| position.chr().is_lowercase())
    ///     .collect::<Vec<_>>();
    ///
    /// let span = Span::from_positions(&positions).unwrap();
    /// assert_eq!("abcdfegh", span.as_str());
    /// ```
    pub fn from_positions(positions: &[Position<'f>]) -> Option<Self> {
        let (head, tail) = positions.split_first()?;
        Some(
            tail.iter()
                .fold(Span::from_single_position(*head), |span, position| {
                    span.extend_to_position(position)
                }),
        )
    }

    pub fn as_str(&self) -> &'f str {
        &self.start.file().as_str()[self.start.byte_offset()..=self.end.byte_offset()]
    }

    pub fn len(&self) -> usize {
        self.end.byte_offset() - self.start.byte_offset() + 1
    }

    pub fn is_single_char(&self) -> bool {
        self.start == self.end
    }

    pub fn start_position(&self) -> Position<'f> {
        self.start
    }

    pub fn end_position(&self) -> Position<'f> {
        self.end
    }

    /// Check if a span extends over multiple lines. A trailing newline
    /// belongs to the line it terminates.
    ///
    /// ```
    /// use asciifile::{AsciiFile, Span};
    ///
    /// let file = AsciiFile::new(b"a\nb").unwrap();
    /// let a = file.iter().next().unwrap();
    /// let newline = file.iter().nth(1).unwrap();
    /// let b = file.iter().last().unwrap();
    /// assert!(!Span::new(a, newline).is_multiline());
    /// assert!(Span::new(a, b).is_multiline());
    /// ```
    pub fn is_multiline(&self) -> bool {
        self.start.row() != self.end.row()
    }

    /// extends the span to include the given position
    pub fn extend_to_position(self, position: &Position<'f>) -> Span<'f> {
        Span::combine(&position.to_single_char_span(), &self)
    }

    pub fn combine(a: &Span<'f>, b: &Span<'f>) -> Span<'f> {
        Span {
            start: min(a.start, b.start),
            end: max(a.end, b.end),
        }
    }

    /// Iterate over the complete source lines touched by this span.
    pub fn lines(&self) -> impl Iterator<Item = Span<'f>> {
        let end = self.end;
        let mut next_line = Some(self.start.line());
        std::iter::from_fn(move || {
            let line = next_line?;
            next_line = if line.end < end {
                line.end.next().map(|position| position.line())
            } else {
                None
            };
            Some(line)
        })
    }
}

impl fmt::Display for Span<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_char() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
