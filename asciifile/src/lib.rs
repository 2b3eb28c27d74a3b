//! Represents an input file that may only contain ASCII characters. The
//! abstractions `Position` and `Span` represent a type-safe index-less
//! wrapper around an ASCII character, respectively a range of characters
//! (a slice) with positional information.
pub mod file;
pub mod iter;
pub mod line_number_cache;
pub mod position;
pub mod span;
pub mod spanned;

pub use self::{
    file::{AsciiFile, EncodingError},
    iter::PositionIterator,
    line_number_cache::LineNumberCache,
    position::Position,
    span::Span,
    spanned::{MaybeSpanned, Message, Spanned},
};
