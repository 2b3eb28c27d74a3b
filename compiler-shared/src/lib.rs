//! State and instrumentation shared by all phases of the compiler.
#![warn(rust_2018_idioms, clippy::doc_markdown, clippy::use_self)]

pub mod context;

#[macro_use]
pub mod timing;

pub use self::context::Context;
