//! Abstraction over a character and its position within a file.
//!
//! Positions form a doubly linked list over the characters of the file
//! they were extracted from (`next()`/`prev()`). There is no end of file
//! character, the end of file is modeled using the `None` case of `Option`.
use crate::{AsciiFile, PositionIterator, Span};
use std::{
    cmp::Ordering,
    fmt::{self, Debug, Display},
};

#[derive(Copy, Clone)]
pub struct Position<'t> {
    byte_offset: usize,
    file: &'t AsciiFile<'t>,
}

impl PartialOrd for Position<'_> {
    fn partial_cmp(&self, other: &Position<'_>) -> Option<Ordering> {
        if !std::ptr::eq(self.file, other.file) {
            return None;
        }
        Some(self.byte_offset.cmp(&other.byte_offset))
    }
}

impl Ord for Position<'_> {
    fn cmp(&self, other: &Position<'_>) -> Ordering {
        if !std::ptr::eq(self.file, other.file) {
            panic!(
                "comparing positions of different files: {:?} {:?}",
                self.file as *const _, other.file as *const _
            )
        }
        self.byte_offset.cmp(&other.byte_offset)
    }
}

impl PartialEq for Position<'_> {
    fn eq(&self, rhs: &Position<'_>) -> bool {
        self.byte_offset == rhs.byte_offset && std::ptr::eq(self.file, rhs.file)
    }
}

impl Eq for Position<'_> {}

impl<'t> Position<'t> {
    /// Create a new Position object pointing at the first character
    /// of a file. Returns `None` for empty files.
    pub fn at_file_start(file: &'t AsciiFile<'t>) -> Option<Self> {
        if file.is_empty() {
            None
        } else {
            Some(Self {
                byte_offset: 0,
                file,
            })
        }
    }

    pub fn to_single_char_span(self) -> Span<'t> {
        Span::from_single_position(self)
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn file(&self) -> &'t AsciiFile<'t> {
        self.file
    }

    /// Get the character at this position
    pub fn chr(&self) -> char {
        self.byte() as char
    }

    /// Get the byte at this position. For matching on the character, you
    /// probably want `chr()` instead.
    pub fn byte(&self) -> u8 {
        self.file.mapping()[self.byte_offset]
    }

    /// Zero based row. Characters on the first line are in row `0`.
    pub fn row(&self) -> usize {
        self.file.line_cache().row(self.byte_offset)
    }

    /// Identical to `row() + 1`
    pub fn line_number(&self) -> usize {
        self.file.line_cache().line_number(self.byte_offset)
    }

    /// Zero based column. The first character of a line is at column `0`.
    pub fn column(&self) -> usize {
        self.file.line_cache().column(self.byte_offset)
    }

    pub fn row_and_column(&self) -> (usize, usize) {
        self.file.line_cache().row_and_column(self.byte_offset)
    }

    /// Get the position immediately following this position or `None` if
    /// this is the last position in the file.
    pub fn next(&self) -> Option<Position<'t>> {
        if self.byte_offset + 1 < self.file.len() {
            Some(Position {
                byte_offset: self.byte_offset + 1,
                file: self.file,
            })
        } else {
            None
        }
    }

    /// Get the position immediately preceding this position or `None` if
    /// this is the first position in the file.
    pub fn prev(&self) -> Option<Position<'t>> {
        self.byte_offset.checked_sub(1).map(|byte_offset| Position {
            byte_offset,
            file: self.file,
        })
    }

    /// Get source code line containing the position. The returned `Span`
    /// includes the trailing newline character of the line, if any.
    ///
    /// ```
    /// use asciifile::AsciiFile;
    ///
    /// let file = AsciiFile::new(b"banana\napple\n\nkiwi").unwrap();
    /// let lines: Vec<(char, String)> = file
    ///     .iter()
    ///     .filter(|position| position.column() == 0)
    ///     .map(|position| (position.chr(), position.line().as_str().to_string()))
    ///     .collect();
    ///
    /// assert_eq!(
    ///     lines,
    ///     vec![
    ///         ('b', "banana\n".to_string()),
    ///         ('a', "apple\n".to_string()),
    ///         ('\n', "\n".to_string()),
    ///         ('k', "kiwi".to_string()),
    ///     ]
    /// );
    /// ```
    ///
    /// Windows style line endings are not considered, `'\r'` is a normal
    /// character.
    pub fn line(&self) -> Span<'t> {
        let start = Position {
            byte_offset: self.byte_offset - self.column(),
            file: self.file,
        };

        let mut end = *self;
        while end.chr() != '\n' {
            match end.next() {
                Some(next) => end = next,
                None => break,
            }
        }

        Span::new(start, end)
    }

    pub fn iter(&self) -> PositionIterator<'t> {
        PositionIterator::new(Some(*self))
    }
}

impl Display for Position<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, col) = self.row_and_column();
        write!(fmt, "{}:{}", row + 1, col + 1)
    }
}

impl Debug for Position<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "Position{{row: {:?}, col: {:?}, byte_offset: {:?}, file: {:?}}}",
            self.row(),
            self.column(),
            self.byte_offset,
            self.file as *const _
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions_to_tuples(positions: Vec<Position<'_>>) -> Vec<((usize, char), (usize, usize))> {
        positions
            .into_iter()
            .map(|position| {
                (
                    (position.byte_offset(), position.chr()),
                    position.row_and_column(),
                )
            })
            .collect()
    }

    #[test]
    fn peeking_works() {
        let file = AsciiFile::new(b"one\ntwo three\nfour\n\n").unwrap();
        let mut i = file.iter();

        loop {
            let peeked = i.peek();
            let consumed = i.next();
            assert_eq!(peeked, consumed);
            if consumed.is_none() {
                break;
            }
        }
    }

    #[test]
    fn peeking_multiple_chars_at_once_works() {
        let input = "one\ntwo three\nfour\n\n";
        let file = AsciiFile::new(input.as_bytes()).unwrap();
        let iter = file.iter();

        let peeked_once = iter.peek_exactly(input.len()).unwrap();
        assert_eq!(input, peeked_once.as_str());

        // state must not be forwarded
        let peeked_twice = iter.peek_exactly(2).unwrap();
        assert_eq!(&input[..2], peeked_twice.as_str());

        assert!(iter.peek_exactly(input.len() + 1).is_none());
        assert_eq!(input, iter.peek_at_most(input.len() + 1).unwrap().as_str());
    }

    #[test]
    fn iterator_works() {
        let file = AsciiFile::new(b"on\nt w\n\n").unwrap();
        let actual = positions_to_tuples(file.iter().collect());

        #[rustfmt::skip]
        let expected = vec![
            ((0, 'o'), (0, 0)),
            ((1, 'n'), (0, 1)),
            ((2, '\n'), (0, 2)),
            ((3, 't'), (1, 0)),
            ((4, ' '), (1, 1)),
            ((5, 'w'), (1, 2)),
            ((6, '\n'), (1, 3)),
            ((7, '\n'), (2, 0)),
        ];

        assert_eq!(expected, actual);
    }

    #[test]
    fn all_indexing_works() {
        let inputs: Vec<&[u8]> = vec![
            &b"one\ntwo three\nfour\n\n"[..],
            &b"a"[..],
            &b"\n"[..],
            &b"\n\n\n\n"[..],
            &b"aksjd\naklsd"[..],
            &b""[..],
        ];
        for input in inputs {
            let file = AsciiFile::new(input).unwrap();

            let mut front_to_back = Vec::new();
            let mut pos = Position::at_file_start(&file);
            while let Some(next) = pos {
                front_to_back.push(next);
                pos = next.next();
            }

            let mut back_to_front = Vec::new();
            let mut pos = file.iter().last();
            while let Some(prev) = pos {
                back_to_front.push(prev);
                pos = prev.prev();
            }
            back_to_front.reverse();

            assert_eq!(back_to_front.len(), input.len());
            assert_eq!(
                positions_to_tuples(back_to_front),
                positions_to_tuples(front_to_back)
            );
        }
    }

    #[test]
    fn display_is_one_based() {
        let file = AsciiFile::new(b"ab\ncd").unwrap();
        let d = file.iter().nth(4).unwrap();
        assert_eq!(d.to_string(), "2:2");
    }

    #[test]
    fn position_partial_cmp_from_different_files_no_ordering() {
        let file1 = AsciiFile::new(b"samestring").unwrap();
        let file2 = AsciiFile::new(b"samestring").unwrap();
        let p1 = file1.iter().next().unwrap();
        let p2 = file2.iter().next().unwrap();
        assert_eq!(p1.partial_cmp(&p2), None);
    }
}
