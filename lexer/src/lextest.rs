//! Token rendering used by `--lextest`.
//!
//! The regular `Display` of `TokenKind` quotes keywords and operators to
//! read well inside error messages, which is not what the lextest format
//! expects.

use crate::TokenKind::{self, *};
use std::fmt;

pub struct Output<'t> {
    token: &'t TokenKind<'t>,
}

impl<'t> Output<'t> {
    pub fn new(token: &'t TokenKind<'t>) -> Self {
        Self { token }
    }
}

impl fmt::Display for Output<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token {
            Keyword(keyword) => write!(f, "{}", keyword),
            Operator(operator) => write!(f, "{}", operator),
            Identifier(symbol) => write!(f, "identifier {}", symbol),
            IntegerLiteral(lit) => write!(f, "integer literal {}", lit),
            Comment(body) => write!(f, "/*{}*/", body),
            Whitespace => Ok(()),
        }
    }
}
