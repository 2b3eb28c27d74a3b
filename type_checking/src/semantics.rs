use derive_more::Display;
use failure::Fail;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Fail)]
pub enum SemanticError {
    #[fail(display = "redefinition of class '{}'", name)]
    DuplicateClass { name: String },

    #[fail(display = "redefinition of {} '{}' in {}", kind, name, scope)]
    DuplicateMember {
        kind: MemberKind,
        name: String,
        scope: String, // "class 'A'", "method 'A.f'"
    },

    #[fail(display = "cannot find class '{}'", name)]
    UnknownClass { name: String },

    #[fail(
        display = "cannot find variable '{}' in class '{}'{}",
        name, class, suggestion
    )]
    UnknownIdentifier {
        name: String,
        class: String,
        suggestion: DidYouMean,
    },

    #[fail(
        display = "no method named '{}' in class '{}'{}",
        name, class, suggestion
    )]
    UnknownMethod {
        name: String,
        class: String,
        suggestion: DidYouMean,
    },

    #[fail(
        display = "method '{}' takes {} argument(s) but {} were supplied",
        method, expected, actual
    )]
    ArityMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[fail(
        display = "mismatched types in {}: expected '{}', found '{}'",
        construct, expected, actual
    )]
    TypeMismatch {
        construct: &'static str,
        expected: String,
        actual: String,
    },

    #[fail(display = "cannot access {} on non-object type '{}'", member, ty)]
    NotAnObject { ty: String, member: String },

    #[fail(display = "cyclic inheritance involving class '{}': {}", class, chain)]
    CyclicInheritance { class: String, chain: String },
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    #[display(fmt = "field")]
    Field,
    #[display(fmt = "method")]
    Method,
    #[display(fmt = "parameter")]
    Parameter,
    #[display(fmt = "local variable")]
    Local,
}

/// Optional hint appended to lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DidYouMean(pub Option<String>);

impl fmt::Display for DidYouMean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(candidate) => write!(f, ", did you mean '{}'?", candidate),
            None => Ok(()),
        }
    }
}
