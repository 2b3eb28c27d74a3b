use crate::{
    method_body_type_checker::MethodBodyTypeChecker,
    semantics::{MemberKind, SemanticError},
    type_analysis::TypeAnalysis,
    type_system::*,
};
use asciifile::Spanned;
use itertools::Itertools;
use parser::ast;
use strtab::Symbol;

pub type SemanticResult<'f, T> = Result<T, Spanned<'f, SemanticError>>;

/// How the checker reacts to the first error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Stop at the first error.
    FailFast,
    /// Collect errors and keep checking with the next statement, member or
    /// class.
    Accumulate,
}

impl Default for CheckMode {
    fn default() -> Self {
        CheckMode::FailFast
    }
}

/// Checking was stopped early. The reason is the last error in the
/// `Reporter`.
#[derive(Debug)]
pub(crate) struct Abort;

pub(crate) struct Reporter<'f> {
    mode: CheckMode,
    errors: Vec<Spanned<'f, SemanticError>>,
}

impl<'f> Reporter<'f> {
    fn new(mode: CheckMode) -> Self {
        Reporter {
            mode,
            errors: Vec::new(),
        }
    }

    pub(crate) fn report(&mut self, err: Spanned<'f, SemanticError>) -> Result<(), Abort> {
        log::debug!("semantic error at {}: {}", err.span, err.data);
        self.errors.push(err);
        match self.mode {
            CheckMode::FailFast => Err(Abort),
            CheckMode::Accumulate => Ok(()),
        }
    }

    /// Turns a failed step into `None` if checking may go on.
    pub(crate) fn recover<T>(&mut self, res: SemanticResult<'f, T>) -> Result<Option<T>, Abort> {
        match res {
            Ok(value) => Ok(Some(value)),
            Err(err) => self.report(err).map(|()| None),
        }
    }
}

/// A method whose signature made it into the class table and whose body
/// still has to be checked.
pub(crate) struct MethodToCheck<'src, 'ast> {
    pub class: Symbol<'src>,
    pub decl: &'ast ast::MethodDeclaration<'src>,
    pub signature: ClassMethodDef<'src>,
}

/// Elaborates a whole program. On success every expression of the program
/// has an entry in the returned `TypeAnalysis`.
pub fn check<'src, 'ast>(
    program: &'ast ast::Program<'src>,
    mode: CheckMode,
) -> Result<(ClassTable<'src>, TypeAnalysis<'src, 'ast>), Vec<Spanned<'src, SemanticError>>> {
    let mut reporter = Reporter::new(mode);

    match elaborate(program, &mut reporter) {
        Ok(result) if reporter.errors.is_empty() => Ok(result),
        _ => Err(reporter.errors),
    }
}

fn elaborate<'src, 'ast>(
    program: &'ast ast::Program<'src>,
    reporter: &mut Reporter<'src>,
) -> Result<(ClassTable<'src>, TypeAnalysis<'src, 'ast>), Abort> {
    let (class_table, methods) = build_class_table(program, reporter)?;

    let mut type_analysis = TypeAnalysis::new();
    MethodBodyTypeChecker::check_main(
        &program.main_class,
        &class_table,
        &mut type_analysis,
        reporter,
    )?;
    for method in &methods {
        MethodBodyTypeChecker::check_method(method, &class_table, &mut type_analysis, reporter)?;
    }

    Ok((class_table, type_analysis))
}

fn build_class_table<'src, 'ast>(
    program: &'ast ast::Program<'src>,
    reporter: &mut Reporter<'src>,
) -> Result<(ClassTable<'src>, Vec<MethodToCheck<'src, 'ast>>), Abort> {
    let mut table = ClassTable::new();

    declare_class(&mut table, &program.main_class.name, None, reporter)?;

    let mut declared = Vec::new();
    for class in &program.classes {
        let parent = class.parent.as_ref().map(|parent| parent.data);
        if declare_class(&mut table, &class.name, parent, reporter)? {
            declared.push(&class.data);
        }
    }

    let mut methods = Vec::new();
    for &class in &declared {
        add_fields(&mut table, class, reporter)?;
        add_methods(&mut table, class, &mut methods, reporter)?;
    }

    for &class in &declared {
        let result = validate_parent(&table, class);
        if reporter.recover(result)?.is_none() {
            table.detach_parent(class.name.data);
        }
    }

    Ok((table, methods))
}

/// Returns whether `name` was new.
fn declare_class<'src>(
    table: &mut ClassTable<'src>,
    name: &Spanned<'src, Symbol<'src>>,
    parent: Option<Symbol<'src>>,
    reporter: &mut Reporter<'src>,
) -> Result<bool, Abort> {
    match table.register_class(name.data, parent) {
        Ok(()) => Ok(true),
        Err(ClassAlreadyDeclared) => {
            reporter.report(Spanned::new(
                name.span,
                SemanticError::DuplicateClass {
                    name: name.data.to_string(),
                },
            ))?;
            Ok(false)
        }
    }
}

fn add_fields<'src>(
    table: &mut ClassTable<'src>,
    class: &ast::ClassDeclaration<'src>,
    reporter: &mut Reporter<'src>,
) -> Result<(), Abort> {
    let class_name = class.name.data;

    for field in &class.fields {
        let ty = match reporter.recover(resolve_type(table, &field.ty))? {
            Some(ty) => ty,
            None => continue,
        };

        let def = ClassFieldDef {
            name: field.name.data,
            ty,
            class: class_name,
        };
        // the class itself was registered before its members
        if table.register_field(class_name, def).is_err() {
            reporter.report(duplicate_member(
                &field.name,
                MemberKind::Field,
                class_name,
            ))?;
        }
    }

    Ok(())
}

fn add_methods<'src, 'ast>(
    table: &mut ClassTable<'src>,
    class: &'ast ast::ClassDeclaration<'src>,
    methods: &mut Vec<MethodToCheck<'src, 'ast>>,
    reporter: &mut Reporter<'src>,
) -> Result<(), Abort> {
    let class_name = class.name.data;

    for method in &class.methods {
        let signature = match reporter.recover(method_signature(table, class_name, method))? {
            Some(signature) => signature,
            None => continue,
        };

        log::debug!("registering method {}", signature);
        // a redefinition stays out of the table, its body is still checked
        // against its own signature
        if table.register_method(class_name, signature.clone()).is_err() {
            reporter.report(duplicate_member(
                &method.name,
                MemberKind::Method,
                class_name,
            ))?;
        }

        methods.push(MethodToCheck {
            class: class_name,
            decl: &method.data,
            signature,
        });
    }

    Ok(())
}

fn duplicate_member<'src>(
    name: &Spanned<'src, Symbol<'src>>,
    kind: MemberKind,
    class: Symbol<'src>,
) -> Spanned<'src, SemanticError> {
    Spanned::new(
        name.span,
        SemanticError::DuplicateMember {
            kind,
            name: name.data.to_string(),
            scope: format!("class '{}'", class),
        },
    )
}

fn method_signature<'src>(
    table: &ClassTable<'src>,
    class: Symbol<'src>,
    method: &ast::MethodDeclaration<'src>,
) -> SemanticResult<'src, ClassMethodDef<'src>> {
    let return_ty = resolve_type(table, &method.return_ty)?;
    let params = method
        .params
        .iter()
        .map(|param| {
            Ok(MethodParamDef {
                name: param.name.data,
                ty: resolve_type(table, &param.ty)?,
            })
        })
        .collect::<SemanticResult<'src, Vec<_>>>()?;

    Ok(ClassMethodDef {
        name: method.name.data,
        params,
        return_ty,
        class,
    })
}

/// Maps a syntactic type to its checked counterpart. Class names must be
/// registered.
pub(crate) fn resolve_type<'src>(
    table: &ClassTable<'src>,
    ty: &Spanned<'src, ast::Type<'src>>,
) -> SemanticResult<'src, CheckedType<'src>> {
    match ty.data {
        ast::Type::Int => Ok(CheckedType::Int),
        ast::Type::Boolean => Ok(CheckedType::Boolean),
        ast::Type::IntArray => Ok(CheckedType::IntArray),
        ast::Type::Class(name) if table.is_class_defined(name) => Ok(CheckedType::TypeRef(name)),
        ast::Type::Class(name) => Err(Spanned::new(
            ty.span,
            SemanticError::UnknownClass {
                name: name.to_string(),
            },
        )),
    }
}

fn validate_parent<'src>(
    table: &ClassTable<'src>,
    class: &ast::ClassDeclaration<'src>,
) -> SemanticResult<'src, ()> {
    let parent = match &class.parent {
        Some(parent) => parent,
        None => return Ok(()),
    };

    if !table.is_class_defined(parent.data) {
        return Err(Spanned::new(
            parent.span,
            SemanticError::UnknownClass {
                name: parent.data.to_string(),
            },
        ));
    }

    let mut chain = vec![class.name.data];
    for ancestor in table.ancestors(parent.data) {
        chain.push(ancestor.name);
        if ancestor.name == class.name.data {
            return Err(Spanned::new(
                parent.span,
                SemanticError::CyclicInheritance {
                    class: class.name.data.to_string(),
                    chain: chain.iter().join(" -> "),
                },
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{method_scope::VarKind, type_analysis::RefInfo};
    use asciifile::AsciiFile;
    use compiler_shared::context::Context;
    use lexer::Lexer;
    use parser::{ast::Expr, ast::Stmt, Parser};
    use strtab::StringTable;
    use utils::assert_matches;

    macro_rules! check_source {
        ($program:ident, $result:ident = $src:expr, $mode:expr) => {
            let mut strtab = StringTable::new();
            let input = AsciiFile::new($src.as_bytes()).unwrap();
            let ctx = Context::dummy(&input);
            let tokens = Lexer::new(&mut strtab, &ctx)
                .map(|r| r.unwrap())
                .filter(|t| !t.data.is_trivia());
            let $program = Parser::new(tokens).parse().unwrap();
            let $result = check(&$program, $mode);
        };
        ($program:ident, $result:ident = $src:expr) => {
            check_source!($program, $result = $src, CheckMode::FailFast)
        };
    }

    fn errors<T>(result: Result<T, Vec<Spanned<'_, SemanticError>>>) -> Vec<SemanticError> {
        match result {
            Ok(_) => panic!("program should have been rejected"),
            Err(errors) => errors.into_iter().map(|err| err.data).collect(),
        }
    }

    fn mismatch(construct: &'static str, expected: &str, actual: &str) -> SemanticError {
        SemanticError::TypeMismatch {
            construct,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    fn collect_stmt<'a, 't>(stmt: &'a Stmt<'t>, out: &mut Vec<&'a Expr<'t>>) {
        match stmt {
            Stmt::Block(stmts) => stmts.iter().for_each(|s| collect_stmt(s, out)),
            Stmt::If(cond, then_arm, else_arm) => {
                collect_expr(cond, out);
                collect_stmt(then_arm, out);
                collect_stmt(else_arm, out);
            }
            Stmt::While(cond, body) => {
                collect_expr(cond, out);
                collect_stmt(body, out);
            }
            Stmt::Println(expr) | Stmt::Assign(_, expr) => collect_expr(expr, out),
            Stmt::ArrayAssign(_, index, value) => {
                collect_expr(index, out);
                collect_expr(value, out);
            }
        }
    }

    fn collect_expr<'a, 't>(expr: &'a Expr<'t>, out: &mut Vec<&'a Expr<'t>>) {
        out.push(expr);
        match expr {
            Expr::Binary(_, lhs, rhs) | Expr::ArrayAccess(lhs, rhs) => {
                collect_expr(lhs, out);
                collect_expr(rhs, out);
            }
            Expr::Not(inner) | Expr::ArrayLength(inner) | Expr::NewIntArray(inner) => {
                collect_expr(inner, out)
            }
            Expr::MethodInvocation(target, _, args) => {
                collect_expr(target, out);
                args.iter().for_each(|arg| collect_expr(arg, out));
            }
            Expr::Int(_) | Expr::Boolean(_) | Expr::Var(_) | Expr::This | Expr::NewObject(_) => {}
        }
    }

    fn all_exprs<'a, 't>(program: &'a ast::Program<'t>) -> Vec<&'a Expr<'t>> {
        let mut out = Vec::new();
        for stmt in &program.main_class.body {
            collect_stmt(stmt, &mut out);
        }
        for class in &program.classes {
            for method in &class.methods {
                for stmt in &method.statements {
                    collect_stmt(stmt, &mut out);
                }
                collect_expr(&method.return_expr, &mut out);
            }
        }
        out
    }

    const WELL_TYPED: &str = "
        class Main {
            public static void main(String[] args) {
                System.out.println(new Counter().start(10));
            }
        }
        class Counter extends Base {
            int[] seen;
            public int start(int limit) {
                int i;
                boolean done;
                i = 0;
                done = false;
                seen = new int[limit];
                while (!done && i < limit) {
                    seen[i] = this.step(i) * 2;
                    i = i + 1;
                    if (seen.length < i) done = true; else { }
                }
                return total - 1;
            }
        }
        class Base {
            int total;
            public int step(int by) { total = total + by; return total; }
        }";

    #[test]
    fn well_typed_program_annotates_every_expression() {
        check_source!(program, result = WELL_TYPED);
        let (table, analysis) = result.unwrap();

        assert_eq!(table.classes().count(), 3);
        let exprs = all_exprs(&program);
        assert!(!exprs.is_empty());
        for &expr in &exprs {
            assert!(
                analysis.expr_info(expr).is_some(),
                "no annotation for {:?}",
                expr
            );
        }
        assert_eq!(analysis.annotated_exprs(), exprs.len());
    }

    #[test]
    fn elaborating_twice_yields_equal_tables() {
        check_source!(program, first = WELL_TYPED);
        let second = check(&program, CheckMode::Accumulate);
        assert_eq!(first.unwrap().1, second.unwrap().1);
    }

    #[test]
    fn forward_references_and_widening() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class C { public A id(B b) { return b; } }
                      class B extends A { }
                      class A { }"
        );
        assert!(result.is_ok());
    }

    #[test]
    fn no_narrowing() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class A { }
                      class B extends A { }
                      class C { public B id(A a) { return a; } }"
        );
        assert_eq!(errors(result), vec![mismatch("return value", "B", "A")]);
    }

    #[test]
    fn unknown_parent() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class B extends A { }"
        );
        assert_eq!(
            errors(result),
            vec![SemanticError::UnknownClass {
                name: "A".to_string()
            }]
        );
    }

    #[test]
    fn inheritance_cycles_are_rejected() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class A extends B { }
                      class B extends A { }"
        );
        assert_eq!(
            errors(result),
            vec![SemanticError::CyclicInheritance {
                class: "A".to_string(),
                chain: "A -> B -> A".to_string()
            }]
        );

        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class A extends A { }"
        );
        assert_matches!(
            errors(result).as_slice(),
            [SemanticError::CyclicInheritance { .. }]
        );
    }

    #[test]
    fn broken_cycle_is_reported_once() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class A extends B { }
                      class B extends A { }
                      class C extends A { }",
            CheckMode::Accumulate
        );
        assert_eq!(errors(result).len(), 1);
    }

    #[test]
    fn duplicates() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class Main { }
                      class A { int x; boolean x; public int f() { return 0; } public int f() { return 1; } }
                      class B { public int g(int p, int p) { return p; } }
                      class C { public int h(int p) { int p; return p; } }",
            CheckMode::Accumulate
        );
        assert_eq!(
            errors(result),
            vec![
                SemanticError::DuplicateClass {
                    name: "Main".to_string()
                },
                SemanticError::DuplicateMember {
                    kind: MemberKind::Field,
                    name: "x".to_string(),
                    scope: "class 'A'".to_string()
                },
                SemanticError::DuplicateMember {
                    kind: MemberKind::Method,
                    name: "f".to_string(),
                    scope: "class 'A'".to_string()
                },
                SemanticError::DuplicateMember {
                    kind: MemberKind::Parameter,
                    name: "p".to_string(),
                    scope: "method 'B.g'".to_string()
                },
                SemanticError::DuplicateMember {
                    kind: MemberKind::Local,
                    name: "p".to_string(),
                    scope: "method 'C.h'".to_string()
                },
            ]
        );
    }

    #[test]
    fn redefined_method_body_is_still_checked() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class A { public int f() { return 0; } public boolean f(int y) { return y; } }",
            CheckMode::Accumulate
        );
        assert_eq!(
            errors(result),
            vec![
                SemanticError::DuplicateMember {
                    kind: MemberKind::Method,
                    name: "f".to_string(),
                    scope: "class 'A'".to_string()
                },
                mismatch("return value", "boolean", "int"),
            ]
        );
    }

    #[test]
    fn operators_and_arrays_reject_wrong_operand_types() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class A {
                          public int f() {
                              int i;
                              boolean b;
                              int[] arr;
                              i = i + b;
                              i = i - b;
                              i = b * i;
                              b = b && i;
                              b = !i;
                              i = i.length;
                              arr = new int[b];
                              arr[0] = b;
                              return i;
                          }
                      }",
            CheckMode::Accumulate
        );
        assert_eq!(
            errors(result),
            vec![
                mismatch("operand of '+'", "int", "boolean"),
                mismatch("operand of '-'", "int", "boolean"),
                mismatch("operand of '*'", "int", "boolean"),
                mismatch("operand of '&&'", "boolean", "int"),
                mismatch("operand of '!'", "boolean", "int"),
                mismatch("'.length'", "int[]", "int"),
                mismatch("array size", "int", "boolean"),
                mismatch("array element", "int", "boolean"),
            ]
        );
    }

    #[test]
    fn arity_is_checked_even_if_types_would_fit() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { System.out.println(new A().f(1, 2)); } }
                      class A { public int f(int x) { return x; } }"
        );
        assert_eq!(
            errors(result),
            vec![SemanticError::ArityMismatch {
                method: "A.f".to_string(),
                expected: 1,
                actual: 2
            }]
        );
    }

    #[test]
    fn boolean_parameter_called_with_int() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { if (new A().m(5)) { } else { } } }
                      class A { public boolean m(boolean b) { return b; } }"
        );
        assert_eq!(errors(result), vec![mismatch("argument", "boolean", "int")]);
    }

    #[test]
    fn condition_must_be_boolean() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { if (5) { } else { } } }"
        );
        let errs = result.unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].data, mismatch("if condition", "boolean", "int"));
        assert_eq!(errs[0].span.as_str(), "5");
    }

    #[test]
    fn indexing_an_int() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class A { public int f(int a, int i) { return a[i]; } }"
        );
        assert_eq!(errors(result), vec![mismatch("array access", "int[]", "int")]);
    }

    #[test]
    fn indexed_assignment_checks_index_value_then_target() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class A { public int f(boolean x) { x[true] = false; x[0] = 1; return 0; } }",
            CheckMode::Accumulate
        );
        assert_eq!(
            errors(result),
            vec![
                mismatch("array index", "int", "boolean"),
                mismatch("indexed assignment", "int[]", "boolean"),
            ]
        );
    }

    #[test]
    fn less_than_needs_equal_operand_types() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { if (1 < true) { } else { } } }"
        );
        assert_eq!(errors(result), vec![mismatch("operand of '<'", "int", "boolean")]);
    }

    #[test]
    fn unknown_names_come_with_suggestions() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class A { int count; public int f() { return cout; } public int g() { return this.ff(); } }",
            CheckMode::Accumulate
        );
        assert_eq!(
            errors(result),
            vec![
                SemanticError::UnknownIdentifier {
                    name: "cout".to_string(),
                    class: "A".to_string(),
                    suggestion: crate::semantics::DidYouMean(Some("count".to_string())),
                },
                SemanticError::UnknownMethod {
                    name: "ff".to_string(),
                    class: "A".to_string(),
                    suggestion: crate::semantics::DidYouMean(Some("f".to_string())),
                },
            ]
        );
    }

    #[test]
    fn main_argument_is_not_a_variable() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] args) { System.out.println(args); } }"
        );
        assert_matches!(
            errors(result).as_slice(),
            [SemanticError::UnknownIdentifier { .. }]
        );
    }

    #[test]
    fn calls_need_objects_of_known_classes() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) {
                          System.out.println(5.f());
                          System.out.println(new Nope().f());
                      } }",
            CheckMode::Accumulate
        );
        assert_eq!(
            errors(result),
            vec![
                SemanticError::NotAnObject {
                    ty: "int".to_string(),
                    member: "method 'f'".to_string()
                },
                SemanticError::UnknownClass {
                    name: "Nope".to_string()
                },
            ]
        );
    }

    #[test]
    fn accumulate_mode_reports_several_errors() {
        let src = "class Main { public static void main(String[] a) { } }
                   class A extends Missing {
                       Unknown u;
                       public int f(int x) {
                           x = true;
                           System.out.println(false);
                           while (x) { x = y; }
                           return x;
                       }
                   }";

        check_source!(program, fail_fast = src);
        assert_eq!(fail_fast.unwrap_err().len(), 1);

        check_source!(program, accumulated = src, CheckMode::Accumulate);
        assert_eq!(
            errors(accumulated),
            vec![
                SemanticError::UnknownClass {
                    name: "Unknown".to_string()
                },
                SemanticError::UnknownClass {
                    name: "Missing".to_string()
                },
                mismatch("assignment", "int", "boolean"),
                mismatch("println argument", "int", "boolean"),
                mismatch("while condition", "boolean", "int"),
                SemanticError::UnknownIdentifier {
                    name: "y".to_string(),
                    class: "A".to_string(),
                    suggestion: crate::semantics::DidYouMean(Some("x".to_string())),
                },
            ]
        );
    }

    #[test]
    fn names_resolve_to_locals_params_and_fields() {
        check_source!(
            program,
            result = "class Main { public static void main(String[] a) { } }
                      class A { int x; }
                      class B extends A {
                          public int f(int p) { int l; l = p; return x + l; }
                          public B me() { return this; }
                      }"
        );
        let (_, analysis) = result.unwrap();

        let class_a = program.classes[0].name.data;
        let class_b = program.classes[1].name.data;
        let f = &program.classes[1].methods[0];

        let (x, l) = match &f.return_expr.data {
            Expr::Binary(_, x, l) => (x, l),
            other => panic!("unexpected return expression {:?}", other),
        };
        let x_info = analysis.expr_info(x).unwrap();
        assert_eq!(x_info.ty, CheckedType::Int);
        assert_eq!(x_info.ref_info, Some(RefInfo::Field { class: class_a }));
        assert_eq!(
            analysis.expr_info(l).unwrap().ref_info,
            Some(RefInfo::Var(VarKind::Local))
        );

        let assign = &f.statements[0].data;
        assert_eq!(
            analysis.assign_target(assign).unwrap().ref_info,
            Some(RefInfo::Var(VarKind::Local))
        );
        let p = match assign {
            Stmt::Assign(_, p) => p,
            other => panic!("unexpected statement {:?}", other),
        };
        assert_eq!(
            analysis.expr_info(p).unwrap().ref_info,
            Some(RefInfo::Var(VarKind::Param))
        );

        let me = &program.classes[1].methods[1];
        let this = analysis.expr_info(&me.return_expr).unwrap();
        assert_eq!(this.ty, CheckedType::TypeRef(class_b));
        assert_eq!(this.ref_info, Some(RefInfo::This));
    }
}
