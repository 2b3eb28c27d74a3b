use crate::{
    checker::{resolve_type, Abort, MethodToCheck, Reporter, SemanticResult},
    dump::MethodScopeDump,
    method_scope::{MethodScope, VarDef, VarKind},
    semantics::{DidYouMean, MemberKind, SemanticError},
    type_analysis::{ExprInfo, RefInfo, TypeAnalysis},
    type_system::{CheckedType, ClassTable},
};
use asciifile::Spanned;
use parser::ast::{self, BinaryOp, Expr, Stmt};
use strtab::{closest_match, Symbol};

/// Traversal state for the body of one method. A fresh instance is created
/// for every method, all of them share the class table and the annotation
/// table.
pub(crate) struct MethodBodyTypeChecker<'src, 'ast, 'a> {
    class_table: &'a ClassTable<'src>,
    current_class: Symbol<'src>,
    scope: MethodScope<'src>,
    type_analysis: &'a mut TypeAnalysis<'src, 'ast>,
    reporter: &'a mut Reporter<'src>,
}

impl<'src, 'ast, 'a> MethodBodyTypeChecker<'src, 'ast, 'a> {
    /// The entry point sees no variables at all, only the (empty) field set
    /// of its class.
    pub(crate) fn check_main(
        main: &'ast ast::MainClass<'src>,
        class_table: &'a ClassTable<'src>,
        type_analysis: &'a mut TypeAnalysis<'src, 'ast>,
        reporter: &'a mut Reporter<'src>,
    ) -> Result<(), Abort> {
        log::debug!("checking main method of class {}", main.name.data);

        let mut checker = MethodBodyTypeChecker {
            class_table,
            current_class: main.name.data,
            scope: MethodScope::new(),
            type_analysis,
            reporter,
        };

        for stmt in &main.body {
            checker.check_statement(stmt)?;
        }
        Ok(())
    }

    pub(crate) fn check_method(
        method: &MethodToCheck<'src, 'ast>,
        class_table: &'a ClassTable<'src>,
        type_analysis: &'a mut TypeAnalysis<'src, 'ast>,
        reporter: &'a mut Reporter<'src>,
    ) -> Result<(), Abort> {
        log::debug!("checking method {}", method.signature);
        let decl = method.decl;

        let formals = decl
            .params
            .iter()
            .zip(&method.signature.params)
            .map(|(param, def)| {
                Spanned::new(
                    param.name.span,
                    VarDef {
                        name: def.name,
                        ty: def.ty,
                        kind: VarKind::Param,
                    },
                )
            })
            .collect::<Vec<_>>();

        let locals = decl
            .locals
            .iter()
            .map(|local| {
                Ok(Spanned::new(
                    local.name.span,
                    VarDef {
                        name: local.name.data,
                        ty: resolve_type(class_table, &local.ty)?,
                        kind: VarKind::Local,
                    },
                ))
            })
            .collect::<SemanticResult<'src, Vec<_>>>();
        let locals = match reporter.recover(locals)? {
            Some(locals) => locals,
            None => return Ok(()),
        };

        let scope = match MethodScope::bind(&formals, &locals) {
            Ok(scope) => scope,
            Err(clash) => {
                let kind = match clash.data.kind {
                    VarKind::Param => MemberKind::Parameter,
                    VarKind::Local => MemberKind::Local,
                };
                return reporter.report(Spanned::new(
                    clash.span,
                    SemanticError::DuplicateMember {
                        kind,
                        name: clash.data.name.to_string(),
                        scope: format!("method '{}.{}'", method.class, decl.name.data),
                    },
                ));
            }
        };
        log::trace!(
            "scope of {}.{}:\n{}",
            method.class,
            decl.name.data,
            MethodScopeDump(&scope)
        );

        let mut checker = MethodBodyTypeChecker {
            class_table,
            current_class: method.class,
            scope,
            type_analysis,
            reporter,
        };

        for stmt in &decl.statements {
            checker.check_statement(stmt)?;
        }

        let return_ty = method.signature.return_ty;
        let res = checker.expect_type(&decl.return_expr, return_ty, "return value");
        checker.reporter.recover(res)?;
        Ok(())
    }

    /// Errors are recovered per statement. Compound statements recover in
    /// their children, so a bad condition does not hide errors in the
    /// branches.
    fn check_statement(&mut self, stmt: &'ast Spanned<'src, Stmt<'src>>) -> Result<(), Abort> {
        log::trace!(
            "checking {} statement at {}",
            ast::StmtDiscriminants::from(&stmt.data),
            stmt.span
        );

        match &stmt.data {
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.check_statement(stmt)?;
                }
            }
            Stmt::If(cond, then_arm, else_arm) => {
                let res = self.expect_type(cond, CheckedType::Boolean, "if condition");
                self.reporter.recover(res)?;
                self.check_statement(then_arm)?;
                self.check_statement(else_arm)?;
            }
            Stmt::While(cond, body) => {
                let res = self.expect_type(cond, CheckedType::Boolean, "while condition");
                self.reporter.recover(res)?;
                self.check_statement(body)?;
            }
            Stmt::Println(expr) => {
                let res = self.expect_type(expr, CheckedType::Int, "println argument");
                self.reporter.recover(res)?;
            }
            Stmt::Assign(target, value) => {
                let res = self.check_assign(&stmt.data, target, value);
                self.reporter.recover(res)?;
            }
            Stmt::ArrayAssign(target, index, value) => {
                let res = self.check_array_assign(&stmt.data, target, index, value);
                self.reporter.recover(res)?;
            }
        }

        Ok(())
    }

    fn check_assign(
        &mut self,
        stmt: &'ast Stmt<'src>,
        target: &Spanned<'src, Symbol<'src>>,
        value: &'ast Spanned<'src, Expr<'src>>,
    ) -> SemanticResult<'src, ()> {
        let target_info = self.resolve_name(target)?;
        let expected = target_info.ty;
        self.type_analysis.set_assign_target(stmt, target_info);
        self.expect_type(value, expected, "assignment")
    }

    fn check_array_assign(
        &mut self,
        stmt: &'ast Stmt<'src>,
        target: &Spanned<'src, Symbol<'src>>,
        index: &'ast Spanned<'src, Expr<'src>>,
        value: &'ast Spanned<'src, Expr<'src>>,
    ) -> SemanticResult<'src, ()> {
        self.expect_type(index, CheckedType::Int, "array index")?;
        self.expect_type(value, CheckedType::Int, "array element")?;

        let target_info = self.resolve_name(target)?;
        let actual = target_info.ty;
        self.type_analysis.set_assign_target(stmt, target_info);

        if actual == CheckedType::IntArray {
            Ok(())
        } else {
            Err(mismatch(target.span, "indexed assignment", CheckedType::IntArray, actual))
        }
    }

    /// Synthesizes the type of `expr` and checks that it can be used where
    /// `expected` is required.
    fn expect_type(
        &mut self,
        expr: &'ast Spanned<'src, Expr<'src>>,
        expected: CheckedType<'src>,
        construct: &'static str,
    ) -> SemanticResult<'src, ()> {
        let actual = self.type_expr(expr)?;
        if expected.is_assignable_from(&actual, self.class_table) {
            Ok(())
        } else {
            Err(mismatch(expr.span, construct, expected, actual))
        }
    }

    /// Synthesizes the type of `expr` and records it in the annotation
    /// table.
    fn type_expr(
        &mut self,
        expr: &'ast Spanned<'src, Expr<'src>>,
    ) -> SemanticResult<'src, CheckedType<'src>> {
        let info = self.synthesize(expr)?;
        let ty = info.ty;
        self.type_analysis.set_expr_info(&expr.data, info);
        Ok(ty)
    }

    fn synthesize(
        &mut self,
        expr: &'ast Spanned<'src, Expr<'src>>,
    ) -> SemanticResult<'src, ExprInfo<'src>> {
        use self::CheckedType::*;

        let info: ExprInfo<'src> = match &expr.data {
            Expr::Binary(BinaryOp::LessThan, lhs, rhs) => {
                let lhs_ty = self.type_expr(lhs)?;
                let rhs_ty = self.type_expr(rhs)?;
                if lhs_ty != rhs_ty {
                    return Err(mismatch(rhs.span, operand_of(BinaryOp::LessThan), lhs_ty, rhs_ty));
                }
                Boolean.into()
            }
            Expr::Binary(BinaryOp::LogicalAnd, lhs, rhs) => {
                let construct = operand_of(BinaryOp::LogicalAnd);
                self.expect_type(lhs, Boolean, construct)?;
                self.expect_type(rhs, Boolean, construct)?;
                Boolean.into()
            }
            // arithmetic
            Expr::Binary(op, lhs, rhs) => {
                let construct = operand_of(*op);
                self.expect_type(lhs, Int, construct)?;
                self.expect_type(rhs, Int, construct)?;
                Int.into()
            }
            Expr::Not(inner) => {
                self.expect_type(inner, Boolean, "operand of '!'")?;
                Boolean.into()
            }
            Expr::ArrayAccess(array, index) => {
                self.expect_type(array, IntArray, "array access")?;
                self.expect_type(index, Int, "array index")?;
                Int.into()
            }
            Expr::ArrayLength(array) => {
                self.expect_type(array, IntArray, "'.length'")?;
                Int.into()
            }
            Expr::MethodInvocation(target, name, args) => {
                self.check_method_invocation(target, name, args)?
            }
            Expr::Int(_) => Int.into(),
            Expr::Boolean(_) => Boolean.into(),
            Expr::Var(name) => self.resolve_name(name)?,
            Expr::This => ExprInfo::new(TypeRef(self.current_class), RefInfo::This),
            Expr::NewIntArray(size) => {
                self.expect_type(size, Int, "array size")?;
                IntArray.into()
            }
            // the class is looked up once a member of the object is used
            Expr::NewObject(class) => TypeRef(class.data).into(),
        };

        Ok(info)
    }

    fn check_method_invocation(
        &mut self,
        target: &'ast Spanned<'src, Expr<'src>>,
        name: &Spanned<'src, Symbol<'src>>,
        args: &'ast Spanned<'src, ast::ArgumentList<'src>>,
    ) -> SemanticResult<'src, ExprInfo<'src>> {
        let class = match self.type_expr(target)? {
            CheckedType::TypeRef(class) => class,
            ty => {
                return Err(Spanned::new(
                    target.span,
                    SemanticError::NotAnObject {
                        ty: ty.to_string(),
                        member: format!("method '{}'", name.data),
                    },
                ))
            }
        };

        if !self.class_table.is_class_defined(class) {
            return Err(Spanned::new(
                target.span,
                SemanticError::UnknownClass {
                    name: class.to_string(),
                },
            ));
        }

        let method = match self.class_table.lookup_method(class, name.data) {
            Some(method) => method.clone(),
            None => {
                let candidates = self
                    .class_table
                    .ancestors(class)
                    .flat_map(|class_def| class_def.methods().map(|method| method.name));
                return Err(Spanned::new(
                    name.span,
                    SemanticError::UnknownMethod {
                        name: name.data.to_string(),
                        class: class.to_string(),
                        suggestion: suggestion(&name.data, candidates),
                    },
                ));
            }
        };

        let arg_types = args
            .iter()
            .map(|arg| self.type_expr(arg))
            .collect::<SemanticResult<'src, Vec<_>>>()?;

        if arg_types.len() != method.params.len() {
            return Err(Spanned::new(
                args.span,
                SemanticError::ArityMismatch {
                    method: format!("{}.{}", method.class, method.name),
                    expected: method.params.len(),
                    actual: arg_types.len(),
                },
            ));
        }

        for ((arg, actual), param) in args.iter().zip(&arg_types).zip(&method.params) {
            if !param.ty.is_assignable_from(actual, self.class_table) {
                return Err(mismatch(arg.span, "argument", param.ty, *actual));
            }
        }

        Ok(ExprInfo::new(
            method.return_ty,
            RefInfo::Method {
                receiver_class: class,
                method,
            },
        ))
    }

    /// Variables of the method shadow fields of the class and its ancestors.
    fn resolve_name(
        &self,
        name: &Spanned<'src, Symbol<'src>>,
    ) -> SemanticResult<'src, ExprInfo<'src>> {
        if let Some(var) = self.scope.lookup(name.data) {
            return Ok(ExprInfo::new(var.ty, RefInfo::Var(var.kind)));
        }

        if let Some(field) = self.class_table.lookup_field(self.current_class, name.data) {
            return Ok(ExprInfo::new(
                field.ty,
                RefInfo::Field { class: field.class },
            ));
        }

        let candidates = self.scope.vars().map(|var| var.name).chain(
            self.class_table
                .ancestors(self.current_class)
                .flat_map(|class_def| class_def.fields().map(|field| field.name)),
        );
        Err(Spanned::new(
            name.span,
            SemanticError::UnknownIdentifier {
                name: name.data.to_string(),
                class: self.current_class.to_string(),
                suggestion: suggestion(&name.data, candidates),
            },
        ))
    }
}

fn operand_of(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::LogicalAnd => "operand of '&&'",
        BinaryOp::LessThan => "operand of '<'",
        BinaryOp::Add => "operand of '+'",
        BinaryOp::Sub => "operand of '-'",
        BinaryOp::Mul => "operand of '*'",
    }
}

fn suggestion<'src>(
    wanted: &Symbol<'src>,
    candidates: impl Iterator<Item = Symbol<'src>>,
) -> DidYouMean {
    DidYouMean(closest_match(wanted, candidates).map(|candidate| candidate.to_string()))
}

fn mismatch<'src>(
    span: asciifile::Span<'src>,
    construct: &'static str,
    expected: CheckedType<'src>,
    actual: CheckedType<'src>,
) -> Spanned<'src, SemanticError> {
    Spanned::new(
        span,
        SemanticError::TypeMismatch {
            construct,
            expected: expected.to_string(),
            actual: actual.to_string(),
        },
    )
}
