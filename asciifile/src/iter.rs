use crate::{Position, Span};

#[derive(Copy, Clone, Debug)]
pub struct PositionIterator<'t> {
    /// Always points to the next character/position to emit
    position_to_emit: Option<Position<'t>>,
}

impl<'t> Iterator for PositionIterator<'t> {
    type Item = Position<'t>;

    fn next(&mut self) -> Option<Position<'t>> {
        let position = self.position_to_emit?;
        self.position_to_emit = position.next();
        Some(position)
    }
}

impl<'t> PositionIterator<'t> {
    pub fn new(position: Option<Position<'t>>) -> Self {
        Self {
            position_to_emit: position,
        }
    }

    /// Look at the next `n` characters without advancing the iterator.
    /// If there are less than `n` characters, return `None`.
    pub fn peek_exactly(&self, n: usize) -> Option<Span<'t>> {
        self.peek_at_most(n)
            .filter(|span| span.as_str().len() == n)
    }

    /// Look at the next `n` characters without advancing the iterator.
    ///
    /// If there are less than `n` characters left, the returned Span will be
    /// shortened to the maximal possible length. If there are no
    /// characters left, a span cannot be built, because a span must contain
    /// at least one character.
    pub fn peek_at_most(&self, n: usize) -> Option<Span<'t>> {
        debug_assert!(n >= 1);
        let span_start = self.position_to_emit?;
        let span_end = self.take(n).last().unwrap_or(span_start);
        Some(Span::new(span_start, span_end))
    }

    pub fn matches(&self, wanted: &str) -> bool {
        if wanted.is_empty() {
            return true;
        }
        self.peek_exactly(wanted.len())
            .map_or(false, |span| span.as_str() == wanted)
    }

    pub fn peek(&self) -> Option<Position<'t>> {
        self.position_to_emit
    }
}
