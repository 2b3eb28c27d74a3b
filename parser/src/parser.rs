#![warn(rust_2018_idioms)]
#![warn(clippy::print_stdout)]

pub mod ast;
pub mod print {
    pub mod pretty;
}
mod spantracker;

use crate::spantracker::*;
use asciifile::{
    MaybeSpanned::{self, *},
    Span, Spanned,
};
use derive_more::Display;
use failure::Fail;
use lexer::{IntLit, Keyword, Operator, Token, TokenKind};
use std::fmt;
use strtab::Symbol;

type Precedence = usize;

// All binary operators of the language are left-associative.
#[rustfmt::skip]
const BINARY_OPERATORS: &[(Operator, ast::BinaryOp, Precedence)] = &[
    (Operator::Star,            ast::BinaryOp::Mul,        1),

    (Operator::Plus,            ast::BinaryOp::Add,        2),
    (Operator::Minus,           ast::BinaryOp::Sub,        2),

    (Operator::LeftChevron,     ast::BinaryOp::LessThan,   3),

    (Operator::DoubleAmpersand, ast::BinaryOp::LogicalAnd, 4),
];

#[derive(Debug, Clone, Fail)]
pub enum SyntaxError {
    #[fail(display = "expected {}, found {}", expected, actual)]
    UnexpectedToken { actual: String, expected: String },
    #[fail(display = "unexpected end of file")]
    UnexpectedEOF,
    #[fail(display = "integer literal {} does not fit into 32 bits", literal)]
    IntegerLiteralOutOfRange { literal: String },
}

impl<'f> From<EOF> for MaybeSpanned<'f, SyntaxError> {
    fn from(_: EOF) -> Self {
        MaybeSpanned::WithoutSpan(SyntaxError::UnexpectedEOF)
    }
}

pub trait ExpectedToken<'f>: fmt::Debug + fmt::Display {
    type Yields;
    fn matching(&self, token: &TokenKind<'f>) -> Option<Self::Yields>;

    fn matches(&self, token: &TokenKind<'f>) -> bool {
        self.matching(token).is_some()
    }
}

#[derive(Debug, Clone, Display)]
#[display(fmt = "{}", _0)]
struct Exactly<'f>(TokenKind<'f>);
#[derive(Debug, Clone, Display)]
#[display(fmt = "a binary operator")]
struct BinaryOp;
#[derive(Debug, Clone, Display)]
#[display(fmt = "an identifier")]
struct Identifier;
#[derive(Debug, Clone, Display)]
#[display(fmt = "an integer literal")]
struct IntegerLiteral;

impl<'f> From<Operator> for Exactly<'f> {
    fn from(op: Operator) -> Self {
        Exactly(TokenKind::Operator(op))
    }
}

impl<'f> From<Keyword> for Exactly<'f> {
    fn from(kw: Keyword) -> Self {
        Exactly(TokenKind::Keyword(kw))
    }
}

fn exactly<'f>(thing: impl Into<Exactly<'f>>) -> Exactly<'f> {
    thing.into()
}

impl<'f> ExpectedToken<'f> for Exactly<'f> {
    type Yields = ();
    fn matching(&self, token: &TokenKind<'f>) -> Option<Self::Yields> {
        if &self.0 == token {
            Some(())
        } else {
            None
        }
    }
}

impl<'f> ExpectedToken<'f> for BinaryOp {
    type Yields = (ast::BinaryOp, Precedence);
    fn matching(&self, token: &TokenKind<'f>) -> Option<Self::Yields> {
        match token {
            TokenKind::Operator(op) => BINARY_OPERATORS
                .iter()
                .find(|(this_op, _, _)| this_op == op)
                .map(|(_, op, prec)| (*op, *prec)),
            _ => None,
        }
    }
}

impl<'f> ExpectedToken<'f> for Identifier {
    type Yields = Symbol<'f>;
    fn matching(&self, token: &TokenKind<'f>) -> Option<Self::Yields> {
        match token {
            TokenKind::Identifier(ident) => Some(*ident),
            _ => None,
        }
    }
}

impl<'f> ExpectedToken<'f> for IntegerLiteral {
    type Yields = IntLit<'f>;
    fn matching(&self, token: &TokenKind<'f>) -> Option<Self::Yields> {
        match token {
            TokenKind::IntegerLiteral(lit) => Some(*lit),
            _ => None,
        }
    }
}

pub type SyntaxResult<'f, T> = Result<T, MaybeSpanned<'f, SyntaxError>>;
type ParserResult<'f, T> = SyntaxResult<'f, Spanned<'f, T>>;
type BoxedResult<'f, T> = SyntaxResult<'f, Box<Spanned<'f, T>>>;

pub struct Parser<'f, I>
where
    I: Iterator<Item = Token<'f>>,
{
    lexer: SpanTracker<'f, I>,
}

macro_rules! spanned {
    ($self:expr, $code:expr) => {{
        let start = $self.lexer.peek_span();
        let data: SyntaxResult<'f, _> = $code;
        let data = data?;
        let end = $self
            .lexer
            .prev_span()
            .expect(concat!(
                "Bug! We can't represent an empty range. ",
                "The `$code` should have consumed at least one token"
            ))
            .end_position();

        // We check the error of `start` only now, because we trust the `$code`
        // to handle the error better than we could.
        let start = start?.start_position();

        let res: SyntaxResult<'f, _> = Ok(Spanned {
            span: Span::new(start, end),
            data,
        });

        res
    }};
}

impl<'f, I> Parser<'f, I>
where
    I: Iterator<Item = Token<'f>>,
{
    /// `lexer` must already be stripped of whitespace and comments.
    pub fn new(lexer: I) -> Self {
        Parser {
            lexer: SpanTracker::new(lexer),
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn omnomnom<E>(&mut self, want: E) -> SyntaxResult<'f, Spanned<'f, E::Yields>>
    where
        E: ExpectedToken<'f>,
    {
        let actual = self.lexer.next()?;

        want.matching(&actual.data)
            .map(|yielded| actual.map(|_| yielded))
            .ok_or_else(|| {
                WithSpan(Spanned {
                    span: actual.span,
                    data: SyntaxError::UnexpectedToken {
                        actual: actual.data.to_string(),
                        expected: want.to_string(),
                    },
                })
            })
    }

    #[allow(clippy::needless_pass_by_value)]
    fn omnomnoptional<E>(&mut self, want: E) -> SyntaxResult<'f, Option<Spanned<'f, E::Yields>>>
    where
        E: ExpectedToken<'f>,
    {
        if self.lexer.eof() {
            return Ok(None);
        }

        let yielded = match want.matching(&self.lexer.peek()?.data) {
            Some(yielded) => yielded,
            None => return Ok(None),
        };

        let got = self.lexer.next()?;
        Ok(Some(got.map(|_| yielded)))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn tastes_like<E>(&mut self, want: E) -> SyntaxResult<'f, bool>
    where
        E: ExpectedToken<'f>,
    {
        self.nth_tastes_like(0, want)
    }

    #[allow(clippy::needless_pass_by_value)]
    fn nth_tastes_like<E>(&mut self, n: usize, want: E) -> SyntaxResult<'f, bool>
    where
        E: ExpectedToken<'f>,
    {
        Ok(self
            .lexer
            .peek_nth(n)
            .map(|got| want.matches(&got.data))
            .unwrap_or(false))
    }

    fn unexpected<T>(&mut self, expected: &str) -> SyntaxResult<'f, T> {
        let actual = self.lexer.next()?;
        Err(WithSpan(Spanned {
            span: actual.span,
            data: SyntaxError::UnexpectedToken {
                actual: actual.data.to_string(),
                expected: expected.to_string(),
            },
        }))
    }

    pub fn parse(&mut self) -> ParserResult<'f, ast::Program<'f>> {
        self.parse_program()
    }

    fn parse_program(&mut self) -> ParserResult<'f, ast::Program<'f>> {
        spanned!(self, {
            let main_class = self.parse_main_class()?;

            let mut classes = Vec::new();
            while !self.lexer.eof() {
                classes.push(self.parse_class_declaration()?);
            }

            Ok(ast::Program {
                main_class,
                classes,
            })
        })
    }

    fn parse_main_class(&mut self) -> ParserResult<'f, ast::MainClass<'f>> {
        spanned!(self, {
            self.omnomnom(exactly(Keyword::Class))?;
            let name = self.omnomnom(Identifier)?;
            self.omnomnom(exactly(Operator::LeftBrace))?;

            // Consume exactly `public static void main(String[] IDENT)`
            self.omnomnom(exactly(Keyword::Public))?;
            self.omnomnom(exactly(Keyword::Static))?;
            self.omnomnom(exactly(Keyword::Void))?;
            self.omnomnom(exactly(Keyword::Main))?;
            self.omnomnom(exactly(Operator::LeftParen))?;
            self.omnomnom(exactly(Keyword::String))?;
            self.omnomnom(exactly(Operator::LeftBracket))?;
            self.omnomnom(exactly(Operator::RightBracket))?;
            let arg = self.omnomnom(Identifier)?;
            self.omnomnom(exactly(Operator::RightParen))?;

            let body = self.parse_block_statements()?;
            self.omnomnom(exactly(Operator::RightBrace))?;

            Ok(ast::MainClass { name, arg, body })
        })
    }

    fn parse_class_declaration(&mut self) -> ParserResult<'f, ast::ClassDeclaration<'f>> {
        spanned!(self, {
            self.omnomnom(exactly(Keyword::Class))?;
            let name = self.omnomnom(Identifier)?;
            let parent = if self.omnomnoptional(exactly(Keyword::Extends))?.is_some() {
                Some(self.omnomnom(Identifier)?)
            } else {
                None
            };

            self.omnomnom(exactly(Operator::LeftBrace))?;

            let mut fields = Vec::new();
            while !self.tastes_like(exactly(Keyword::Public))?
                && !self.tastes_like(exactly(Operator::RightBrace))?
            {
                fields.push(self.parse_var_decl()?);
            }

            let mut methods = Vec::new();
            while self
                .omnomnoptional(exactly(Operator::RightBrace))?
                .is_none()
            {
                methods.push(self.parse_method_declaration()?);
            }

            Ok(ast::ClassDeclaration {
                name,
                parent,
                fields,
                methods,
            })
        })
    }

    /// `Type IDENT ;`
    fn parse_var_decl(&mut self) -> ParserResult<'f, ast::VarDecl<'f>> {
        spanned!(self, {
            let ty = self.parse_type()?;
            let name = self.omnomnom(Identifier)?;
            self.omnomnom(exactly(Operator::Semicolon))?;
            Ok(ast::VarDecl { ty, name })
        })
    }

    fn parse_method_declaration(&mut self) -> ParserResult<'f, ast::MethodDeclaration<'f>> {
        spanned!(self, {
            self.omnomnom(exactly(Keyword::Public))?;
            let return_ty = self.parse_type()?;
            let name = self.omnomnom(Identifier)?;
            let params = self.parse_parnethesized_list(|parser| parser.parse_parameter())?;

            self.omnomnom(exactly(Operator::LeftBrace))?;

            let mut locals = Vec::new();
            while self.tastes_like_var_decl()? {
                locals.push(self.parse_var_decl()?);
            }

            let mut statements = Vec::new();
            while !self.tastes_like(exactly(Keyword::Return))? {
                statements.push(self.parse_statement()?);
            }

            self.omnomnom(exactly(Keyword::Return))?;
            let return_expr = self.parse_expression()?;
            self.omnomnom(exactly(Operator::Semicolon))?;
            self.omnomnom(exactly(Operator::RightBrace))?;

            Ok(ast::MethodDeclaration {
                return_ty,
                name,
                params: params.data,
                locals,
                statements,
                return_expr,
            })
        })
    }

    // `int` and `boolean` can only start a declaration. An identifier starts
    // one only if it is directly followed by another identifier (`Foo foo;`),
    // otherwise it is the target of an assignment (`foo = ...`, `foo[...]`).
    fn tastes_like_var_decl(&mut self) -> SyntaxResult<'f, bool> {
        Ok(self.tastes_like(exactly(Keyword::Int))?
            || self.tastes_like(exactly(Keyword::Boolean))?
            || (self.tastes_like(Identifier)? && self.nth_tastes_like(1, Identifier)?))
    }

    fn parse_parameter(&mut self) -> ParserResult<'f, ast::VarDecl<'f>> {
        spanned!(self, {
            let ty = self.parse_type()?;
            let name = self.omnomnom(Identifier)?;
            Ok(ast::VarDecl { ty, name })
        })
    }

    fn parse_type(&mut self) -> ParserResult<'f, ast::Type<'f>> {
        spanned!(self, {
            if self.omnomnoptional(exactly(Keyword::Int))?.is_some() {
                if self
                    .omnomnoptional(exactly(Operator::LeftBracket))?
                    .is_some()
                {
                    self.omnomnom(exactly(Operator::RightBracket))?;
                    Ok(ast::Type::IntArray)
                } else {
                    Ok(ast::Type::Int)
                }
            } else if self.omnomnoptional(exactly(Keyword::Boolean))?.is_some() {
                Ok(ast::Type::Boolean)
            } else if let Some(sym) = self.omnomnoptional(Identifier)? {
                Ok(ast::Type::Class(sym.data))
            } else {
                self.unexpected("keyword 'int', 'boolean' or an identifier")
            }
        })
    }

    /// Statements up to and including the closing `}` of a block.
    fn parse_block_statements(&mut self) -> SyntaxResult<'f, Vec<Spanned<'f, ast::Stmt<'f>>>> {
        self.omnomnom(exactly(Operator::LeftBrace))?;

        let mut statements = Vec::new();
        while self
            .omnomnoptional(exactly(Operator::RightBrace))?
            .is_none()
        {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    fn parse_statement(&mut self) -> ParserResult<'f, ast::Stmt<'f>> {
        spanned!(self, {
            use self::ast::Stmt::*;

            if self.tastes_like(exactly(Operator::LeftBrace))? {
                Ok(Block(self.parse_block_statements()?))
            } else if self.omnomnoptional(exactly(Keyword::If))?.is_some() {
                self.omnomnom(exactly(Operator::LeftParen))?;
                let cond = self.parse_expression()?;
                self.omnomnom(exactly(Operator::RightParen))?;

                let then_arm = self.parse_statement()?;
                self.omnomnom(exactly(Keyword::Else))?;
                let else_arm = self.parse_statement()?;

                Ok(If(cond, Box::new(then_arm), Box::new(else_arm)))
            } else if self.omnomnoptional(exactly(Keyword::While))?.is_some() {
                self.omnomnom(exactly(Operator::LeftParen))?;
                let cond = self.parse_expression()?;
                self.omnomnom(exactly(Operator::RightParen))?;

                let body = self.parse_statement()?;

                Ok(While(cond, Box::new(body)))
            } else if self.omnomnoptional(exactly(Keyword::System))?.is_some() {
                self.omnomnom(exactly(Operator::Dot))?;
                self.omnomnom(exactly(Keyword::Out))?;
                self.omnomnom(exactly(Operator::Dot))?;
                self.omnomnom(exactly(Keyword::Println))?;
                self.omnomnom(exactly(Operator::LeftParen))?;
                let expr = self.parse_expression()?;
                self.omnomnom(exactly(Operator::RightParen))?;
                self.omnomnom(exactly(Operator::Semicolon))?;

                Ok(Println(expr))
            } else if let Some(target) = self.omnomnoptional(Identifier)? {
                if self.omnomnoptional(exactly(Operator::Equal))?.is_some() {
                    let value = self.parse_expression()?;
                    self.omnomnom(exactly(Operator::Semicolon))?;

                    Ok(Assign(target, value))
                } else {
                    self.omnomnom(exactly(Operator::LeftBracket))?;
                    let index = self.parse_expression()?;
                    self.omnomnom(exactly(Operator::RightBracket))?;
                    self.omnomnom(exactly(Operator::Equal))?;
                    let value = self.parse_expression()?;
                    self.omnomnom(exactly(Operator::Semicolon))?;

                    Ok(ArrayAssign(target, index, value))
                }
            } else {
                self.unexpected("a statement")
            }
        })
    }

    fn parse_expression(&mut self) -> BoxedResult<'f, ast::Expr<'f>> {
        self.parse_binary_expression()
    }

    /// This uses an adapted version of Djikstras original "Shunting Yard"
    /// algorithm [1]. While this traditionally only converts to RPN, it is
    /// combined with an RPN evaluator [2] to build the AST of the
    /// expression on the fly instead. This can also be seen
    /// as a non-recursive variant of precedence climbing [3].
    ///
    /// [1]: https://en.wikipedia.org/wiki/Shunting-yard_algorithm
    /// [2]: https://en.wikipedia.org/wiki/Reverse_Polish_notation#Postfix_evaluation_algorithm
    /// [3]: https://eli.thegreenplace.net/2012/08/02/parsing-expressions-by-precedence-climbing
    fn parse_binary_expression(&mut self) -> BoxedResult<'f, ast::Expr<'f>> {
        let mut operator_stack: Vec<(ast::BinaryOp, Precedence)> = Vec::new();
        let mut operand_stack = Vec::new();

        fn rpn_eval<'f>(operand_stack: &mut Vec<Box<Spanned<'f, ast::Expr<'f>>>>, op: ast::BinaryOp) {
            // Invariant: we only construct valid RPN
            let rhs = operand_stack.pop().expect("rhs operand");
            let lhs = operand_stack.pop().expect("lhs operand");
            let res = Box::new(Spanned {
                span: Span::combine(&lhs.span, &rhs.span),
                data: ast::Expr::Binary(op, lhs, rhs),
            });
            operand_stack.push(res);
        }

        operand_stack.push(self.parse_unary_expression()?);

        // Convert to RPN, but "evaluate" RPN on-the-fly (where "evaluate" means
        // constructing an AST)
        while let Some((op, prec)) = self.omnomnoptional(BinaryOp)?.map(|spanned| spanned.data) {
            // This is the part that replaces the recursion from precedence climbing.
            // Operators of lower or equal precedence on the stack are left-associative
            // and therefore bind before the one we are holding.
            while let Some(&(top_op, top_prec)) = operator_stack.last() {
                if top_prec > prec {
                    break;
                }
                operator_stack.pop();
                rpn_eval(&mut operand_stack, top_op);
            }

            operator_stack.push((op, prec));
            operand_stack.push(self.parse_unary_expression()?);
        }

        // Consume remaining operators
        while let Some((op, _)) = operator_stack.pop() {
            rpn_eval(&mut operand_stack, op)
        }

        debug_assert_eq!(operand_stack.len(), 1);
        operand_stack.pop().ok_or(WithoutSpan(SyntaxError::UnexpectedEOF))
    }

    fn parse_unary_expression(&mut self) -> BoxedResult<'f, ast::Expr<'f>> {
        let mut ops = Vec::new();
        while let Some(op) = self.omnomnoptional(exactly(Operator::Exclaim))? {
            ops.push(op.span);
        }

        let mut expr = self.parse_postfix_expression()?;

        for op_span in ops.into_iter().rev() {
            expr = Box::new(Spanned {
                span: Span::combine(&op_span, &expr.span),
                data: ast::Expr::Not(expr),
            });
        }

        Ok(expr)
    }

    fn parse_postfix_expression(&mut self) -> BoxedResult<'f, ast::Expr<'f>> {
        let mut expr = self.parse_primary_expression()?;

        loop {
            expr = Box::new(if self.omnomnoptional(exactly(Operator::Dot))?.is_some() {
                if let Some(length) = self.omnomnoptional(exactly(Keyword::Length))? {
                    // array length: EXPR.length
                    Spanned {
                        span: Span::combine(&expr.span, &length.span),
                        data: ast::Expr::ArrayLength(expr),
                    }
                } else {
                    // method call: EXPR.ident(arg1, arg2, ...)
                    let method = self.omnomnom(Identifier)?;
                    let args = self.parse_parameter_values()?;

                    Spanned {
                        span: Span::combine(&expr.span, &args.span),
                        data: ast::Expr::MethodInvocation(expr, method, args),
                    }
                }
            } else if self
                .omnomnoptional(exactly(Operator::LeftBracket))?
                .is_some()
            {
                // array access: EXPR[EXPR]
                let index_expr = self.parse_expression()?;
                let closing = self.omnomnom(exactly(Operator::RightBracket))?;

                Spanned {
                    span: Span::combine(&expr.span, &closing.span),
                    data: ast::Expr::ArrayAccess(expr, index_expr),
                }
            } else {
                break;
            });
        }

        Ok(expr)
    }

    fn parse_primary_expression(&mut self) -> BoxedResult<'f, ast::Expr<'f>> {
        spanned!(self, {
            use self::ast::Expr::*;

            if let Some(lit) = self.omnomnoptional(IntegerLiteral)? {
                match lit.data.parse::<i32>() {
                    Ok(value) => Ok(Int(value)),
                    Err(_) => Err(WithSpan(Spanned {
                        span: lit.span,
                        data: SyntaxError::IntegerLiteralOutOfRange {
                            literal: lit.data.to_string(),
                        },
                    })),
                }
            } else if self.omnomnoptional(exactly(Keyword::True))?.is_some() {
                Ok(Boolean(true))
            } else if self.omnomnoptional(exactly(Keyword::False))?.is_some() {
                Ok(Boolean(false))
            } else if self.omnomnoptional(exactly(Keyword::This))?.is_some() {
                Ok(This)
            } else if let Some(var) = self.omnomnoptional(Identifier)? {
                Ok(Var(var))
            } else if self.omnomnoptional(exactly(Keyword::New))?.is_some() {
                if self.omnomnoptional(exactly(Keyword::Int))?.is_some() {
                    // new array expression
                    self.omnomnom(exactly(Operator::LeftBracket))?;
                    let size = self.parse_expression()?;
                    self.omnomnom(exactly(Operator::RightBracket))?;
                    Ok(NewIntArray(size))
                } else {
                    // new object expression
                    let class = self.omnomnom(Identifier)?;
                    self.omnomnom(exactly(Operator::LeftParen))?;
                    self.omnomnom(exactly(Operator::RightParen))?;
                    Ok(NewObject(class))
                }
            } else if self.omnomnoptional(exactly(Operator::LeftParen))?.is_some() {
                // parenthesized expression
                let expr = self.parse_expression()?;
                self.omnomnom(exactly(Operator::RightParen))?;

                // Early return, there is no `Expr::Parenthesized`. The
                // expression keeps its own span without the parentheses.
                return Ok(expr);
            } else {
                self.unexpected("a primary expression")
            }
        })
        .map(Box::new)
    }

    fn parse_parameter_values(&mut self) -> ParserResult<'f, ast::ArgumentList<'f>> {
        self.parse_parnethesized_list(|parser| Ok(*parser.parse_expression()?))
    }

    fn parse_parnethesized_list<F, T>(&mut self, parse_element: F) -> ParserResult<'f, Vec<T>>
    where
        F: Fn(&mut Self) -> SyntaxResult<'f, T>,
    {
        spanned!(self, {
            let mut list = Vec::new();
            self.omnomnom(exactly(Operator::LeftParen))?;

            if !self.tastes_like(exactly(Operator::RightParen))? {
                list.push(parse_element(self)?);
                while self.omnomnoptional(exactly(Operator::Comma))?.is_some() {
                    list.push(parse_element(self)?);
                }
            }

            self.omnomnom(exactly(Operator::RightParen))?;

            Ok(list)
        })
    }
}
