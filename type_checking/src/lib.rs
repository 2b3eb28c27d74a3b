#![warn(rust_2018_idioms)]
#![warn(clippy::print_stdout)]

//! Semantic elaboration: builds the class table of a parsed program and
//! type-checks every method body against it. The result is a side-table of
//! annotations; the syntax tree itself is never modified.

pub mod checker;
pub mod dump;
mod method_body_type_checker;
pub mod method_scope;
pub mod semantics;
pub mod type_analysis;
pub mod type_system;

pub use self::{
    checker::{check, CheckMode, SemanticResult},
    semantics::SemanticError,
    type_analysis::TypeAnalysis,
    type_system::{CheckedType, ClassTable},
};
