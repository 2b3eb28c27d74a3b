//! The variables visible inside one method body: parameters and locals.
//! Both live in a single flat namespace. Blocks do not open new scopes.

use crate::type_system::CheckedType;
use asciifile::Spanned;
use derive_more::Display;
use std::collections::HashMap;
use strtab::Symbol;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    #[display(fmt = "param")]
    Param,
    #[display(fmt = "local")]
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarDef<'src> {
    pub name: Symbol<'src>,
    pub ty: CheckedType<'src>,
    pub kind: VarKind,
}

#[derive(Debug, Default)]
pub struct MethodScope<'src> {
    vars: Vec<VarDef<'src>>,
    by_name: HashMap<Symbol<'src>, usize>,
}

impl<'src> MethodScope<'src> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `var` unless a variable of the same name exists. The existing
    /// definition is kept in that case.
    pub fn define(&mut self, var: VarDef<'src>) -> Result<(), VarDef<'src>> {
        if let Some(&idx) = self.by_name.get(&var.name) {
            return Err(self.vars[idx]);
        }
        self.by_name.insert(var.name, self.vars.len());
        self.vars.push(var);
        Ok(())
    }

    /// Builds the scope of a method from its formals followed by its locals.
    /// Fails with the first definition whose name is already taken.
    pub fn bind<'f>(
        formals: &[Spanned<'f, VarDef<'src>>],
        locals: &[Spanned<'f, VarDef<'src>>],
    ) -> Result<Self, Spanned<'f, VarDef<'src>>> {
        let mut scope = Self::new();
        for var in formals.iter().chain(locals) {
            scope.define(var.data).map_err(|_| *var)?;
        }
        Ok(scope)
    }

    pub fn lookup(&self, name: Symbol<'src>) -> Option<&VarDef<'src>> {
        self.by_name.get(&name).map(|&idx| &self.vars[idx])
    }

    /// All variables, formals first, in declaration order.
    pub fn vars(&self) -> impl Iterator<Item = &VarDef<'src>> {
        self.vars.iter()
    }
}
