use asciifile::Span;
use lexer::Token;
use std::collections::VecDeque;

/// Token stream for the parser with arbitrary lookahead. Remembers the span
/// of the last consumed token, so that a composite node can compute its
/// span once its children are parsed.
pub struct SpanTracker<'f, I>
where
    I: Iterator<Item = Token<'f>>,
{
    tokens: I,
    lookahead: VecDeque<Token<'f>>,
    prev_span: Option<Span<'f>>,
}

#[derive(Debug)]
pub struct EOF;
type EOFResult<T> = Result<T, EOF>;

impl<'f, I> SpanTracker<'f, I>
where
    I: Iterator<Item = Token<'f>>,
{
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            lookahead: VecDeque::new(),
            prev_span: None,
        }
    }

    pub fn next(&mut self) -> EOFResult<Token<'f>> {
        let next = match self.lookahead.pop_front() {
            Some(token) => token,
            None => self.tokens.next().ok_or(EOF)?,
        };
        self.prev_span = Some(next.span);
        Ok(next)
    }

    pub fn peek(&mut self) -> EOFResult<&Token<'f>> {
        self.peek_nth(0)
    }

    /// The token after the next `n` ones.
    pub fn peek_nth(&mut self, n: usize) -> EOFResult<&Token<'f>> {
        while self.lookahead.len() <= n {
            let token = self.tokens.next().ok_or(EOF)?;
            self.lookahead.push_back(token);
        }
        Ok(&self.lookahead[n])
    }

    pub fn eof(&mut self) -> bool {
        self.peek().is_err()
    }

    pub fn prev_span(&self) -> Option<Span<'f>> {
        self.prev_span
    }

    pub fn peek_span(&mut self) -> EOFResult<Span<'f>> {
        self.peek().map(|token| token.span)
    }
}
