use crate::Span;
use std::{fmt, ops::Deref};

/// A value together with the source range it was read from.
///
/// Equality ignores the span: two identifiers spelled the same are equal
/// wherever they appear.
#[derive(Debug, Clone, Copy)]
pub struct Spanned<'f, T> {
    pub span: Span<'f>,
    pub data: T,
}

impl<'f, T> Spanned<'f, T> {
    pub fn new(span: Span<'f>, data: T) -> Self {
        Self { span, data }
    }

    /// Replace the data, keeping the span.
    pub fn map<U, F>(&self, f: F) -> Spanned<'f, U>
    where
        F: FnOnce(&T) -> U,
    {
        Spanned::new(self.span, f(&self.data))
    }

    pub fn as_ref(&self) -> Spanned<'f, &T> {
        Spanned::new(self.span, &self.data)
    }
}

impl<T: PartialEq> PartialEq for Spanned<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for Spanned<'_, T> {}

impl<T> Deref for Spanned<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.data, self.span)
    }
}

/// A diagnostic payload that may or may not point into the source file.
/// Errors about the file as a whole, like an unexpected end of input, have
/// no span.
#[derive(Debug)]
pub enum MaybeSpanned<'f, T> {
    WithoutSpan(T),
    WithSpan(Spanned<'f, T>),
}

impl<'f, T> MaybeSpanned<'f, T> {
    pub fn span(&self) -> Option<Span<'f>> {
        match self {
            MaybeSpanned::WithoutSpan(_) => None,
            MaybeSpanned::WithSpan(spanned) => Some(spanned.span),
        }
    }
}

impl<T> Deref for MaybeSpanned<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            MaybeSpanned::WithoutSpan(data) | MaybeSpanned::WithSpan(Spanned { data, .. }) => data,
        }
    }
}

/// Diagnostics accept anything displayable, with or without a span.
pub type Message<'f, 'd> = MaybeSpanned<'f, &'d dyn fmt::Display>;

impl<'f, 'd, T: fmt::Display + 'd> From<&'d Spanned<'f, T>> for Message<'f, 'd> {
    fn from(spanned: &'d Spanned<'f, T>) -> Self {
        MaybeSpanned::WithSpan(Spanned::new(spanned.span, &spanned.data))
    }
}

impl<'f, 'd, T: fmt::Display + 'd> From<&'d MaybeSpanned<'f, T>> for Message<'f, 'd> {
    fn from(maybe: &'d MaybeSpanned<'f, T>) -> Self {
        match maybe {
            MaybeSpanned::WithoutSpan(data) => MaybeSpanned::WithoutSpan(data),
            MaybeSpanned::WithSpan(spanned) => spanned.into(),
        }
    }
}
