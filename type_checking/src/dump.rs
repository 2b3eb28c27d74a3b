//! Human readable renderings of the elaboration results, for `--dump-*`
//! flags and trace logging.

use crate::{
    method_scope::MethodScope,
    type_analysis::{ExprInfo, TypeAnalysis},
    type_system::ClassTable,
};
use asciifile::{Span, Spanned};
use itertools::Itertools;
use parser::ast::{self, Expr, Stmt};
use std::fmt;

/// One line per class, followed by its own fields and methods, indented.
pub struct ClassTableDump<'a, 'src>(pub &'a ClassTable<'src>);

impl fmt::Display for ClassTableDump<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class in self.0.classes() {
            match class.parent {
                Some(parent) => writeln!(f, "class {} extends {}", class.name, parent)?,
                None => writeln!(f, "class {}", class.name)?,
            }
            for field in class.fields() {
                writeln!(f, "\tfield {} : {}", field.name, field.ty)?;
            }
            for method in class.methods() {
                writeln!(
                    f,
                    "\tmethod {}({}) -> {}",
                    method.name,
                    method.params.iter().map(|param| param.ty).join(", "),
                    method.return_ty
                )?;
            }
        }
        Ok(())
    }
}

pub struct MethodScopeDump<'a, 'src>(pub &'a MethodScope<'src>);

impl fmt::Display for MethodScopeDump<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for var in self.0.vars() {
            writeln!(f, "{} {} : {}", var.kind, var.name, var.ty)?;
        }
        Ok(())
    }
}

/// Every name use, call and assignment target of `program`, in source
/// order: `line:col name : type (resolution)`.
pub struct AnnotationDump<'a, 'src, 'ast> {
    pub program: &'ast ast::Program<'src>,
    pub analysis: &'a TypeAnalysis<'src, 'ast>,
}

impl<'a, 'src, 'ast> fmt::Display for AnnotationDump<'a, 'src, 'ast> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut collector = Collector {
            analysis: self.analysis,
            lines: Vec::new(),
        };

        for stmt in &self.program.main_class.body {
            collector.stmt(stmt);
        }
        for class in &self.program.classes {
            for method in &class.methods {
                for stmt in &method.statements {
                    collector.stmt(stmt);
                }
                collector.expr(&method.return_expr);
            }
        }

        collector.lines.sort_by_key(|(offset, _)| *offset);
        for (_, line) in &collector.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

struct Collector<'a, 'src, 'ast> {
    analysis: &'a TypeAnalysis<'src, 'ast>,
    lines: Vec<(usize, String)>,
}

impl<'a, 'src, 'ast> Collector<'a, 'src, 'ast> {
    fn note(&mut self, span: Span<'src>, name: &dyn fmt::Display, info: Option<&ExprInfo<'src>>) {
        let info = match info {
            Some(info) => info,
            None => return,
        };
        let resolution = match &info.ref_info {
            Some(ref_info) => format!(" ({})", ref_info),
            None => String::new(),
        };

        let start = span.start_position();
        self.lines.push((
            start.byte_offset(),
            format!("{} {} : {}{}", start, name, info.ty, resolution),
        ));
    }

    fn stmt(&mut self, stmt: &'ast Spanned<'src, Stmt<'src>>) {
        let analysis = self.analysis;
        match &stmt.data {
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.stmt(stmt);
                }
            }
            Stmt::If(cond, then_arm, else_arm) => {
                self.expr(cond);
                self.stmt(then_arm);
                self.stmt(else_arm);
            }
            Stmt::While(cond, body) => {
                self.expr(cond);
                self.stmt(body);
            }
            Stmt::Println(expr) => self.expr(expr),
            Stmt::Assign(target, value) => {
                self.note(target.span, &target.data, analysis.assign_target(&stmt.data));
                self.expr(value);
            }
            Stmt::ArrayAssign(target, index, value) => {
                self.note(target.span, &target.data, analysis.assign_target(&stmt.data));
                self.expr(index);
                self.expr(value);
            }
        }
    }

    fn expr(&mut self, expr: &'ast Spanned<'src, Expr<'src>>) {
        let analysis = self.analysis;
        match &expr.data {
            Expr::Binary(_, lhs, rhs) | Expr::ArrayAccess(lhs, rhs) => {
                self.expr(lhs);
                self.expr(rhs);
            }
            Expr::Not(inner) | Expr::ArrayLength(inner) | Expr::NewIntArray(inner) => {
                self.expr(inner)
            }
            Expr::MethodInvocation(target, name, args) => {
                self.expr(target);
                self.note(name.span, &name.data, analysis.expr_info(&expr.data));
                for arg in args.iter() {
                    self.expr(arg);
                }
            }
            Expr::Var(name) => self.note(name.span, &name.data, analysis.expr_info(&expr.data)),
            Expr::This => self.note(expr.span, &"this", analysis.expr_info(&expr.data)),
            Expr::Int(_) | Expr::Boolean(_) | Expr::NewObject(_) => {}
        }
    }
}
