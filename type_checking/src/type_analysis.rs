use crate::{
    method_scope::VarKind,
    type_system::{CheckedType, ClassMethodDef},
};
use parser::ast;
use std::{collections::HashMap, fmt};
use strtab::Symbol;
use utils::RefEq;

/// What the checker learned about one expression: its static type and,
/// for names and calls, what the name resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprInfo<'src> {
    pub ty: CheckedType<'src>,
    pub ref_info: Option<RefInfo<'src>>,
}

impl<'src> ExprInfo<'src> {
    pub fn new(ty: CheckedType<'src>, ref_info: RefInfo<'src>) -> Self {
        ExprInfo {
            ty,
            ref_info: Some(ref_info),
        }
    }
}

impl<'src> From<CheckedType<'src>> for ExprInfo<'src> {
    fn from(ty: CheckedType<'src>) -> Self {
        ExprInfo { ty, ref_info: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefInfo<'src> {
    Var(VarKind),
    /// `class` is the declaring class, not necessarily the current one
    Field { class: Symbol<'src> },
    This,
    Method {
        receiver_class: Symbol<'src>,
        method: ClassMethodDef<'src>,
    },
}

impl fmt::Display for RefInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefInfo::Var(kind) => write!(f, "{}", kind),
            RefInfo::Field { class } => write!(f, "field of {}", class),
            RefInfo::This => write!(f, "this"),
            RefInfo::Method { method, .. } => write!(f, "call {}", method),
        }
    }
}

/// Side-table with the results of type checking. The AST itself is never
/// mutated, nodes are keyed by address instead.
#[derive(Debug, Default, PartialEq)]
pub struct TypeAnalysis<'src, 'ast> {
    expr_info: HashMap<RefEq<&'ast ast::Expr<'src>>, ExprInfo<'src>>,
    assign_target: HashMap<RefEq<&'ast ast::Stmt<'src>>, ExprInfo<'src>>,
}

impl<'src, 'ast> TypeAnalysis<'src, 'ast> {
    pub fn new() -> Self {
        TypeAnalysis::default()
    }

    pub fn expr_info(&self, expr: &'ast ast::Expr<'src>) -> Option<&ExprInfo<'src>> {
        self.expr_info.get(&RefEq(expr))
    }

    pub(crate) fn set_expr_info(&mut self, expr: &'ast ast::Expr<'src>, info: ExprInfo<'src>) {
        self.expr_info.insert(RefEq(expr), info);
    }

    /// Resolution of the left-hand side name of `id = e` and `id[i] = e`.
    pub fn assign_target(&self, stmt: &'ast ast::Stmt<'src>) -> Option<&ExprInfo<'src>> {
        self.assign_target.get(&RefEq(stmt))
    }

    pub(crate) fn set_assign_target(&mut self, stmt: &'ast ast::Stmt<'src>, info: ExprInfo<'src>) {
        self.assign_target.insert(RefEq(stmt), info);
    }

    pub fn annotated_exprs(&self) -> usize {
        self.expr_info.len()
    }
}
