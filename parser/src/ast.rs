use asciifile::Spanned;
use derive_more::Display;
use strtab::Symbol;
use strum_macros::EnumDiscriminants;

/// This is the top-level AST node. The entry class always comes first,
/// followed by all other class declarations in source order.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Program<'t> {
    pub main_class: Spanned<'t, MainClass<'t>>,
    pub classes: Vec<Spanned<'t, ClassDeclaration<'t>>>,
}

/// The class holding `public static void main(String[] arg)`. It has no
/// parent, no fields and no other methods.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MainClass<'t> {
    pub name: Spanned<'t, Symbol<'t>>,
    pub arg: Spanned<'t, Symbol<'t>>,
    pub body: Vec<Spanned<'t, Stmt<'t>>>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ClassDeclaration<'t> {
    pub name: Spanned<'t, Symbol<'t>>,
    pub parent: Option<Spanned<'t, Symbol<'t>>>,
    pub fields: Vec<Spanned<'t, VarDecl<'t>>>,
    pub methods: Vec<Spanned<'t, MethodDeclaration<'t>>>,
}

/// A `(type, name)` pair. Used for fields, parameters and locals alike.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VarDecl<'t> {
    pub ty: Spanned<'t, Type<'t>>,
    pub name: Spanned<'t, Symbol<'t>>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MethodDeclaration<'t> {
    pub return_ty: Spanned<'t, Type<'t>>,
    pub name: Spanned<'t, Symbol<'t>>,
    pub params: Vec<Spanned<'t, VarDecl<'t>>>,
    pub locals: Vec<Spanned<'t, VarDecl<'t>>>,
    pub statements: Vec<Spanned<'t, Stmt<'t>>>,
    pub return_expr: Box<Spanned<'t, Expr<'t>>>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Type<'t> {
    Int,
    Boolean,
    IntArray,
    Class(Symbol<'t>),
}

/// A statement can have one of the kinds:
/// * `Block`: a sequence of statements, it does not open a new scope
/// * `If`: condition, then-branch and the mandatory else-branch
/// * `While`: condition and body
/// * `Println`: `System.out.println(expr);`
/// * `Assign`: `id = expr;`
/// * `ArrayAssign`: `id[index] = expr;`
#[derive(EnumDiscriminants, Debug, PartialEq, Eq, Clone)]
#[strum_discriminants(derive(Display))]
pub enum Stmt<'t> {
    Block(Vec<Spanned<'t, Stmt<'t>>>),
    If(
        Box<Spanned<'t, Expr<'t>>>,
        Box<Spanned<'t, Stmt<'t>>>,
        Box<Spanned<'t, Stmt<'t>>>,
    ),
    While(Box<Spanned<'t, Expr<'t>>>, Box<Spanned<'t, Stmt<'t>>>),
    Println(Box<Spanned<'t, Expr<'t>>>),
    Assign(Spanned<'t, Symbol<'t>>, Box<Spanned<'t, Expr<'t>>>),
    ArrayAssign(
        Spanned<'t, Symbol<'t>>,
        Box<Spanned<'t, Expr<'t>>>,
        Box<Spanned<'t, Expr<'t>>>,
    ),
}

/// An expression is either one of
/// * `Binary`: one of the operations defined in `BinaryOp`
/// * `Not`: logical negation
/// * `ArrayAccess`: `foo[42]`
/// * `ArrayLength`: `foo.length`
/// * `MethodInvocation`: `foo.method(args)`
///
/// or one of the primary expressions
/// * `Int`: an integer literal, range checked by the parser
/// * `Boolean`: a boolean literal
/// * `Var`: use of a variable
/// * `This`: the `this` keyword
/// * `NewIntArray`: `new int[size]`
/// * `NewObject`: `new Foo()`
#[derive(EnumDiscriminants, Debug, PartialEq, Eq, Clone)]
#[strum_discriminants(derive(Display))]
pub enum Expr<'t> {
    Binary(
        BinaryOp,
        Box<Spanned<'t, Expr<'t>>>,
        Box<Spanned<'t, Expr<'t>>>,
    ),
    Not(Box<Spanned<'t, Expr<'t>>>),

    // Postfix ops
    ArrayAccess(Box<Spanned<'t, Expr<'t>>>, Box<Spanned<'t, Expr<'t>>>),
    ArrayLength(Box<Spanned<'t, Expr<'t>>>),
    MethodInvocation(
        Box<Spanned<'t, Expr<'t>>>,
        Spanned<'t, Symbol<'t>>,
        Spanned<'t, ArgumentList<'t>>,
    ),

    // The primary expressions
    Int(i32),
    Boolean(bool),
    Var(Spanned<'t, Symbol<'t>>),
    This,
    NewIntArray(Box<Spanned<'t, Expr<'t>>>),
    NewObject(Spanned<'t, Symbol<'t>>),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOp {
    LogicalAnd,
    LessThan,
    Add,
    Sub,
    Mul,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LessThan => "<",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
        }
    }
}

pub type ArgumentList<'t> = Vec<Spanned<'t, Expr<'t>>>;

impl std::fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Boolean => write!(f, "boolean"),
            Type::IntArray => write!(f, "int[]"),
            Type::Class(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_display_variant_names() {
        let block = Stmt::Block(Vec::new());
        assert_eq!(StmtDiscriminants::from(&block).to_string(), "Block");
        assert_eq!(ExprDiscriminants::from(&Expr::This).to_string(), "This");
    }
}
