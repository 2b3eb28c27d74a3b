//! Renders a `Program` back into canonical source text: one declaration or
//! statement per line, tab indentation, and every binary or negated
//! expression wrapped in parentheses.

use crate::ast::{self, Expr, Stmt};
use asciifile::Spanned;
use failure::Error;
use itertools::Itertools;
use std::io::{self, Write};

struct IndentPrinter<'w> {
    writer: &'w mut dyn Write,
    indent: usize,
    indent_on_next_write: bool,
}

impl<'w> IndentPrinter<'w> {
    fn new(writer: &'w mut dyn Write) -> IndentPrinter<'w> {
        IndentPrinter {
            writer,
            indent: 0,
            indent_on_next_write: false,
        }
    }

    fn print(&mut self, args: std::fmt::Arguments<'_>) -> io::Result<()> {
        self.indent_if_required()?;
        self.writer.write_fmt(args)
    }

    fn print_str(&mut self, s: &str) -> io::Result<()> {
        self.indent_if_required()?;
        self.writer.write_all(s.as_bytes())
    }

    fn newline(&mut self) -> io::Result<()> {
        writeln!(self.writer)?;
        self.indent_on_next_write = true;
        Ok(())
    }

    fn println(&mut self, args: std::fmt::Arguments<'_>) -> io::Result<()> {
        self.print(args)?;
        self.newline()
    }

    fn indent_if_required(&mut self) -> io::Result<()> {
        if self.indent_on_next_write {
            write!(self.writer, "{}", "\t".repeat(self.indent))?;
            self.indent_on_next_write = false;
        }
        Ok(())
    }

    fn indent(&mut self) {
        self.indent += 1;
    }

    fn outdent(&mut self) {
        debug_assert!(self.indent > 0, "setting indent below 0");
        self.indent = self.indent.saturating_sub(1);
    }
}

pub fn print(program: &ast::Program<'_>, out: &mut dyn Write) -> Result<(), Error> {
    let mut printer = IndentPrinter::new(out);
    print_program(program, &mut printer)?;
    Ok(())
}

fn print_program(program: &ast::Program<'_>, printer: &mut IndentPrinter<'_>) -> io::Result<()> {
    let main = &program.main_class;
    printer.println(format_args!("class {} {{", main.name.data))?;
    printer.indent();
    printer.print(format_args!(
        "public static void main(String[] {}) ",
        main.arg.data
    ))?;
    print_block(&main.body, printer)?;
    printer.newline()?;
    printer.outdent();
    printer.println(format_args!("}}"))?;

    for class in &program.classes {
        print_class(class, printer)?;
    }

    Ok(())
}

fn print_class(
    class: &ast::ClassDeclaration<'_>,
    printer: &mut IndentPrinter<'_>,
) -> io::Result<()> {
    match &class.parent {
        Some(parent) => printer.print(format_args!("class {} extends {} {{", class.name.data, parent.data))?,
        None => printer.print(format_args!("class {} {{", class.name.data))?,
    }

    if class.fields.is_empty() && class.methods.is_empty() {
        return printer.println(format_args!(" }}"));
    }

    printer.newline()?;
    printer.indent();
    for field in &class.fields {
        print_var_decl(field, printer)?;
    }
    for method in &class.methods {
        print_method(method, printer)?;
    }
    printer.outdent();
    printer.println(format_args!("}}"))
}

fn print_var_decl(decl: &ast::VarDecl<'_>, printer: &mut IndentPrinter<'_>) -> io::Result<()> {
    printer.println(format_args!("{} {};", decl.ty.data, decl.name.data))
}

fn print_method(
    method: &ast::MethodDeclaration<'_>,
    printer: &mut IndentPrinter<'_>,
) -> io::Result<()> {
    let params = method
        .params
        .iter()
        .map(|param| format!("{} {}", param.ty.data, param.name.data))
        .join(", ");
    printer.println(format_args!(
        "public {} {}({}) {{",
        method.return_ty.data, method.name.data, params
    ))?;

    printer.indent();
    for local in &method.locals {
        print_var_decl(local, printer)?;
    }
    for stmt in &method.statements {
        print_stmt(stmt, printer)?;
        printer.newline()?;
    }
    printer.print_str("return ")?;
    print_expr(&method.return_expr, printer)?;
    printer.println(format_args!(";"))?;
    printer.outdent();

    printer.println(format_args!("}}"))
}

fn print_block(
    statements: &[Spanned<'_, Stmt<'_>>],
    printer: &mut IndentPrinter<'_>,
) -> io::Result<()> {
    if statements.is_empty() {
        return printer.print_str("{ }");
    }

    printer.print_str("{")?;
    printer.newline()?;
    printer.indent();
    for stmt in statements {
        print_stmt(stmt, printer)?;
        printer.newline()?;
    }
    printer.outdent();
    printer.print_str("}")
}

/// Bodies of `if`, `else` and `while`: blocks stay on the same line, single
/// statements go on their own indented line.
fn print_body(body: &Stmt<'_>, printer: &mut IndentPrinter<'_>) -> io::Result<()> {
    match body {
        Stmt::Block(statements) => {
            printer.print_str(" ")?;
            print_block(statements, printer)
        }
        _ => {
            printer.newline()?;
            printer.indent();
            print_stmt(body, printer)?;
            printer.outdent();
            Ok(())
        }
    }
}

/// Statements are printed without trailing newline.
fn print_stmt(stmt: &Stmt<'_>, printer: &mut IndentPrinter<'_>) -> io::Result<()> {
    match stmt {
        Stmt::Block(statements) => print_block(statements, printer),
        Stmt::If(cond, then_arm, else_arm) => {
            printer.print_str("if (")?;
            print_expr(cond, printer)?;
            printer.print_str(")")?;
            print_body(then_arm, printer)?;
            match then_arm.data {
                Stmt::Block(_) => printer.print_str(" else")?,
                _ => {
                    printer.newline()?;
                    printer.print_str("else")?;
                }
            }
            print_body(else_arm, printer)
        }
        Stmt::While(cond, body) => {
            printer.print_str("while (")?;
            print_expr(cond, printer)?;
            printer.print_str(")")?;
            print_body(body, printer)
        }
        Stmt::Println(expr) => {
            printer.print_str("System.out.println(")?;
            print_expr(expr, printer)?;
            printer.print_str(");")
        }
        Stmt::Assign(target, value) => {
            printer.print(format_args!("{} = ", target.data))?;
            print_expr(value, printer)?;
            printer.print_str(";")
        }
        Stmt::ArrayAssign(target, index, value) => {
            printer.print(format_args!("{}[", target.data))?;
            print_expr(index, printer)?;
            printer.print_str("] = ")?;
            print_expr(value, printer)?;
            printer.print_str(";")
        }
    }
}

fn print_expr(expr: &Expr<'_>, printer: &mut IndentPrinter<'_>) -> io::Result<()> {
    match expr {
        Expr::Binary(op, lhs, rhs) => {
            printer.print_str("(")?;
            print_expr(lhs, printer)?;
            printer.print(format_args!(" {} ", op.symbol()))?;
            print_expr(rhs, printer)?;
            printer.print_str(")")
        }
        Expr::Not(inner) => {
            printer.print_str("(!")?;
            print_expr(inner, printer)?;
            printer.print_str(")")
        }
        Expr::ArrayAccess(array, index) => {
            print_expr(array, printer)?;
            printer.print_str("[")?;
            print_expr(index, printer)?;
            printer.print_str("]")
        }
        Expr::ArrayLength(array) => {
            print_expr(array, printer)?;
            printer.print_str(".length")
        }
        Expr::MethodInvocation(target, name, args) => {
            print_expr(target, printer)?;
            printer.print(format_args!(".{}(", name.data))?;
            for (i, arg) in args.iter().enumerate() {
                if i != 0 {
                    printer.print_str(", ")?;
                }
                print_expr(arg, printer)?;
            }
            printer.print_str(")")
        }
        Expr::Int(value) => printer.print(format_args!("{}", value)),
        Expr::Boolean(value) => printer.print(format_args!("{}", value)),
        Expr::Var(name) => printer.print(format_args!("{}", name.data)),
        Expr::This => printer.print_str("this"),
        Expr::NewIntArray(size) => {
            printer.print_str("new int[")?;
            print_expr(size, printer)?;
            printer.print_str("]")
        }
        Expr::NewObject(class) => printer.print(format_args!("new {}()", class.data)),
    }
}
