#![warn(rust_2018_idioms)]
#![warn(clippy::print_stdout)]

pub mod lextest;

use asciifile::{Position, PositionIterator, Span, Spanned};
use compiler_shared::context::Context;
use derive_more::Display;
use diagnostics::u8_to_printable_representation;
use failure::Fail;
use std::{convert::TryFrom, fmt, result::Result};
use strtab::{StringTable, Symbol};

macro_rules! match_op {
    ($input:expr, $( ($token_string:expr, $token:expr) ),+: $len:expr, $default:expr) => {{
        match $input.peek_at_most($len) {
            Some(span) => match span.as_str() {
                $(
                    $token_string => match_op!($input, span, $len, $token),
                )+
                _ => $default,
            },
            None => $default,
        }
    }};
    ($input:expr, $span:ident, $len:expr, $right:expr) => {{
        debug_assert!($len >= 1);
        for _ in 0..$len {
            $input.next();
        }
        Some(Ok(Token::new($span, TokenKind::Operator($right))))
    }};
}

pub type TokenResult<'f> = Result<Token<'f>, LexicalError<'f>>;

pub type Token<'f> = Spanned<'f, TokenKind<'f>>;
pub type LexicalError<'f> = Spanned<'f, ErrorKind>;

pub type IntLit<'f> = &'f str;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Display)]
/// Keywords are single-ticked, operators back-ticked
pub enum TokenKind<'f> {
    #[display(fmt = "'{}'", _0)]
    Keyword(Keyword),
    #[display(fmt = "`{}`", _0)]
    Operator(Operator),
    #[display(fmt = "identifier `{}`", _0)]
    Identifier(Symbol<'f>),
    #[display(fmt = "integer literal `{}`", _0)]
    IntegerLiteral(IntLit<'f>),
    #[display(fmt = "a comment")]
    Comment(&'f str),
    #[display(fmt = "whitespace")]
    Whitespace,
}

impl TokenKind<'_> {
    /// Whitespace and comments carry no meaning for the parser.
    pub fn is_trivia(&self) -> bool {
        match self {
            TokenKind::Whitespace | TokenKind::Comment(_) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Fail)]
pub enum ErrorKind {
    UnclosedComment,
    UnexpectedCharacter(u8),
    LeadingZero,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ErrorKind::UnclosedComment => write!(f, "unclosed comment"),
            ErrorKind::UnexpectedCharacter(byte) => fmt_unexpected_character(f, byte),
            ErrorKind::LeadingZero => {
                write!(f, "integer literals other than 0 must not start with 0")
            }
        }
    }
}

fn fmt_unexpected_character(f: &mut fmt::Formatter<'_>, byte: u8) -> fmt::Result {
    match byte as char {
        '\n' => write!(f, "Unexpected newline"),
        '\\' => write!(f, "Unexpected backslash"),
        '\'' => write!(f, "Unexpected single quote"),
        '"' => write!(f, "Unexpected double quote"),
        chr if chr.is_whitespace() => write!(
            f,
            "Unexpected whitespace '{}'",
            u8_to_printable_representation(byte)
        ),
        chr if chr.is_control() => write!(
            f,
            "Unexpected control character '{}'",
            u8_to_printable_representation(byte)
        ),
        _ => write!(
            f,
            "Unexpected character '{}'",
            u8_to_printable_representation(byte)
        ),
    }
}

#[derive(Debug, Fail)]
pub enum Warning {
    #[fail(display = "confusing usage of comment separator inside a comment")]
    CommentSeparatorInsideComment,
}

#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord, Copy)]
pub enum Keyword {
    Boolean,
    Class,
    Else,
    Extends,
    False,
    If,
    Int,
    Length,
    Main,
    New,
    Out,
    Println,
    Public,
    Return,
    Static,
    String,
    System,
    This,
    True,
    Void,
    While,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::Keyword::*;
        write!(
            f,
            "{}",
            match self {
                Boolean => "boolean",
                Class => "class",
                Else => "else",
                Extends => "extends",
                False => "false",
                If => "if",
                Int => "int",
                Length => "length",
                Main => "main",
                New => "new",
                Out => "out",
                Println => "println",
                Public => "public",
                Return => "return",
                Static => "static",
                String => "String",
                System => "System",
                This => "this",
                True => "true",
                Void => "void",
                While => "while",
            }
        )
    }
}

impl TryFrom<&str> for Keyword {
    type Error = ();

    fn try_from(s: &str) -> Result<Keyword, Self::Error> {
        use self::Keyword::*;

        match s {
            "boolean" => Ok(Boolean),
            "class" => Ok(Class),
            "else" => Ok(Else),
            "extends" => Ok(Extends),
            "false" => Ok(False),
            "if" => Ok(If),
            "int" => Ok(Int),
            "length" => Ok(Length),
            "main" => Ok(Main),
            "new" => Ok(New),
            "out" => Ok(Out),
            "println" => Ok(Println),
            "public" => Ok(Public),
            "return" => Ok(Return),
            "static" => Ok(Static),
            "String" => Ok(String),
            "System" => Ok(System),
            "this" => Ok(This),
            "true" => Ok(True),
            "void" => Ok(Void),
            "while" => Ok(While),
            _ => Err(()),
        }
    }
}

// Use non-semantic names, since e.g. '<' might mean more than 'less-than'
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord, Copy)]
pub enum Operator {
    DoubleAmpersand,
    Exclaim,
    LeftParen,
    RightParen,
    Star,
    Plus,
    Comma,
    Minus,
    Dot,
    Semicolon,
    LeftChevron,
    Equal,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::Operator::*;
        write!(
            f,
            "{}",
            match self {
                DoubleAmpersand => "&&",
                Exclaim => "!",
                LeftParen => "(",
                RightParen => ")",
                Star => "*",
                Plus => "+",
                Comma => ",",
                Minus => "-",
                Dot => ".",
                Semicolon => ";",
                LeftChevron => "<",
                Equal => "=",
                LeftBracket => "[",
                RightBracket => "]",
                LeftBrace => "{",
                RightBrace => "}",
            }
        )
    }
}

pub struct Lexer<'f, 's> {
    input: PositionIterator<'f>,
    strtab: &'s mut StringTable<'f>,
    context: &'f Context<'f>,
}

fn is_minijava_whitespace(c: char) -> bool {
    match c {
        ' ' | '\n' | '\r' | '\t' => true,
        _ => false,
    }
}

impl<'f, 's> Lexer<'f, 's> {
    pub fn new(strtab: &'s mut StringTable<'f>, context: &'f Context<'f>) -> Self {
        let input = context.file.iter();

        Self {
            context,
            strtab,
            input,
        }
    }

    fn lex_token(&mut self) -> Option<TokenResult<'f>> {
        let position = self.input.peek()?;
        Some(match position.chr() {
            'a'..='z' | 'A'..='Z' => self.lex_identifier_or_keyword(position),
            '0'..='9' => self.lex_integer_literal(position),
            c if is_minijava_whitespace(c) => self.lex_whitespace(position),
            '/' if self.input.matches("/*") => self.lex_comment(position),
            '/' if self.input.matches("//") => self.lex_line_comment(position),

            _ => self.lex_operator().unwrap_or_else(|| {
                self.input.next();
                Err(LexicalError::new(
                    position.to_single_char_span(),
                    ErrorKind::UnexpectedCharacter(position.byte()),
                ))
            }),
        })
    }

    fn lex_identifier_or_keyword(&mut self, start: Position<'f>) -> TokenResult<'f> {
        let span = self.lex_while(start, |position| match position.chr() {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => true,
            _ => false,
        });

        let kind = match Keyword::try_from(span.as_str()) {
            Ok(keyword) => TokenKind::Keyword(keyword),
            Err(()) => TokenKind::Identifier(self.strtab.intern(span.as_str())),
        };

        Ok(Token::new(span, kind))
    }

    fn lex_integer_literal(&mut self, start: Position<'f>) -> TokenResult<'f> {
        let span = self.lex_while(start, |position| position.chr().is_ascii_digit());

        if start.chr() == '0' && !span.is_single_char() {
            return Err(LexicalError::new(span, ErrorKind::LeadingZero));
        }

        Ok(Token::new(span, TokenKind::IntegerLiteral(span.as_str())))
    }

    fn lex_comment(&mut self, comment_start: Position<'f>) -> TokenResult<'f> {
        debug_assert!(self.input.matches("/*"));
        self.input.next();
        self.input.next();

        let mut body: Option<Span<'f>> = None;
        loop {
            if self.input.matches("*/") {
                self.input.next();
                let comment_end = self.input.next().unwrap_or(comment_start);
                let text = body.map(|span| span.as_str()).unwrap_or("");
                return Ok(Token::new(
                    Span::new(comment_start, comment_end),
                    TokenKind::Comment(text),
                ));
            }

            if self.input.matches("/*") {
                if let Some(separator) = self.input.peek_exactly(2) {
                    self.context.diagnostics.warning(&Spanned::new(
                        separator,
                        Warning::CommentSeparatorInsideComment,
                    ));
                }
            }

            match self.input.next() {
                Some(position) => {
                    body = Some(match body {
                        Some(span) => span.extend_to_position(&position),
                        None => position.to_single_char_span(),
                    });
                }
                None => {
                    let span = match body {
                        Some(span) => span.extend_to_position(&comment_start),
                        None => Span::new(comment_start, comment_start),
                    };
                    return Err(LexicalError::new(span, ErrorKind::UnclosedComment));
                }
            }
        }
    }

    fn lex_line_comment(&mut self, comment_start: Position<'f>) -> TokenResult<'f> {
        debug_assert!(self.input.matches("//"));
        let span = self.lex_while(comment_start, |position| position.chr() != '\n');
        Ok(Token::new(span, TokenKind::Comment(&span.as_str()[2..])))
    }

    fn lex_whitespace(&mut self, start: Position<'f>) -> TokenResult<'f> {
        let span = self.lex_while(start, |position| is_minijava_whitespace(position.chr()));
        Ok(Token::new(span, TokenKind::Whitespace))
    }

    fn lex_operator(&mut self) -> Option<TokenResult<'f>> {
        use self::Operator::*;

        match_op!(
            self.input,
            ("&&", DoubleAmpersand):
            2,
            match_op!(
                self.input,
                ("!", Exclaim),
                ("(", LeftParen),
                (")", RightParen),
                ("*", Star),
                ("+", Plus),
                (",", Comma),
                ("-", Minus),
                (".", Dot),
                (";", Semicolon),
                ("<", LeftChevron),
                ("=", Equal),
                ("[", LeftBracket),
                ("]", RightBracket),
                ("{", LeftBrace),
                ("}", RightBrace):
                1,
                None
            )
        )
    }

    /// Consumes `start` and every following character for which `predicate`
    /// holds. `start` must be the next character of the input.
    fn lex_while<P>(&mut self, start: Position<'f>, predicate: P) -> Span<'f>
    where
        P: Fn(Position<'f>) -> bool,
    {
        debug_assert_eq!(self.input.peek(), Some(start));
        self.input.next();

        let mut consumed = start.to_single_char_span();
        while let Some(peeked) = self.input.peek() {
            if !predicate(peeked) {
                break;
            }
            self.input.next();
            consumed = consumed.extend_to_position(&peeked);
        }

        consumed
    }
}

impl<'f, 's> Iterator for Lexer<'f, 's> {
    type Item = TokenResult<'f>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lex_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asciifile::AsciiFile;
    use utils::assert_matches;

    macro_rules! lex_input {
        ($tokens:ident = $input:expr) => {
            let mut strtab = StringTable::new();
            let input = AsciiFile::new($input.as_bytes()).unwrap();
            let ctx = Context::dummy(&input);
            let $tokens: Vec<TokenResult<'_>> = Lexer::new(&mut strtab, &ctx)
                .filter(|t| match t {
                    Ok(token) => !token.is_trivia(),
                    Err(_) => true,
                })
                .collect();
        };
    }

    fn kinds<'f>(tokens: &[TokenResult<'f>]) -> Vec<TokenKind<'f>> {
        tokens
            .iter()
            .map(|t| t.as_ref().map(|token| token.data).unwrap())
            .collect()
    }

    #[test]
    fn minijava_whitespace() {
        let chars = "\x07\x08\x0c\x0b"; // \a \b \f \v
        for c in chars.chars() {
            assert_eq!(is_minijava_whitespace(c), false)
        }
    }

    #[test]
    fn keywords_operators_and_identifiers() {
        lex_input!(tokens = "class Foo extends Bar { int[] x_1; }");
        let kinds = kinds(&tokens);

        assert_eq!(kinds.len(), 11);
        assert_eq!(kinds[0], TokenKind::Keyword(Keyword::Class));
        match kinds[1] {
            TokenKind::Identifier(sym) => assert_eq!(sym.as_str(), "Foo"),
            kind => panic!("expected identifier, got {}", kind),
        }
        assert_eq!(kinds[2], TokenKind::Keyword(Keyword::Extends));
        assert_eq!(kinds[4], TokenKind::Operator(Operator::LeftBrace));
        assert_eq!(kinds[5], TokenKind::Keyword(Keyword::Int));
        assert_eq!(kinds[6], TokenKind::Operator(Operator::LeftBracket));
        assert_eq!(kinds[7], TokenKind::Operator(Operator::RightBracket));
        assert_matches!(kinds[8], TokenKind::Identifier(_));
        assert_eq!(kinds[9], TokenKind::Operator(Operator::Semicolon));
    }

    #[test]
    fn print_statement_keywords() {
        lex_input!(tokens = "System.out.println(a.length);");
        let kinds = kinds(&tokens);
        assert_eq!(
            kinds[..6],
            [
                TokenKind::Keyword(Keyword::System),
                TokenKind::Operator(Operator::Dot),
                TokenKind::Keyword(Keyword::Out),
                TokenKind::Operator(Operator::Dot),
                TokenKind::Keyword(Keyword::Println),
                TokenKind::Operator(Operator::LeftParen),
            ]
        );
        assert_eq!(kinds[8], TokenKind::Keyword(Keyword::Length));
    }

    #[test]
    fn double_ampersand_is_one_token() {
        lex_input!(tokens = "a&&b");
        let kinds = kinds(&tokens);
        assert_eq!(kinds.len(), 3);
        assert_eq!(kinds[1], TokenKind::Operator(Operator::DoubleAmpersand));
    }

    #[test]
    fn single_ampersand_is_an_error() {
        lex_input!(tokens = "a & b");
        assert_matches!(
            tokens[1],
            Err(Spanned {
                data: ErrorKind::UnexpectedCharacter(b'&'),
                ..
            })
        );
    }

    #[test]
    fn integer_literals() {
        lex_input!(tokens = "0 42 1000");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::IntegerLiteral("0"),
                TokenKind::IntegerLiteral("42"),
                TokenKind::IntegerLiteral("1000"),
            ]
        );
    }

    #[test]
    fn leading_zero_is_rejected() {
        lex_input!(tokens = "007");
        assert_eq!(tokens.len(), 1);
        match &tokens[0] {
            Err(err) => {
                assert_matches!(err.data, ErrorKind::LeadingZero);
                assert_eq!(err.span.as_str(), "007");
            }
            Ok(token) => panic!("expected error, got {:?}", token),
        }
    }

    #[test]
    fn comments_are_trivia() {
        lex_input!(tokens = "a /* block\n comment */ b // line comment\nc");
        let kinds = kinds(&tokens);
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn comment_body_excludes_delimiters() {
        let mut strtab = StringTable::new();
        let input = AsciiFile::new(b"/* body */").unwrap();
        let ctx = Context::dummy(&input);
        let tokens: Vec<_> = Lexer::new(&mut strtab, &ctx).collect();
        assert_eq!(tokens.len(), 1);
        assert_matches!(
            tokens[0],
            Ok(Spanned {
                data: TokenKind::Comment(" body "),
                ..
            })
        );
    }

    #[test]
    fn unclosed_comment() {
        lex_input!(tokens = "a /* never closed");
        assert_matches!(
            tokens[1],
            Err(Spanned {
                data: ErrorKind::UnclosedComment,
                ..
            })
        );
    }

    #[test]
    fn nested_comment_separator_warns() {
        let mut strtab = StringTable::new();
        let input = AsciiFile::new(b"/* a /* b */").unwrap();
        let ctx = Context::dummy(&input);
        let tokens: Vec<_> = Lexer::new(&mut strtab, &ctx).collect();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_ok());
        assert_eq!(
            ctx.diagnostics
                .count(diagnostics::MessageLevel::Warning),
            1
        );
    }

    #[test]
    fn identifiers_are_interned() {
        let mut strtab = StringTable::new();
        let input = AsciiFile::new(b"foo bar foo").unwrap();
        let ctx = Context::dummy(&input);
        let idents: Vec<_> = Lexer::new(&mut strtab, &ctx)
            .filter_map(|t| match t.unwrap().data {
                TokenKind::Identifier(sym) => Some(sym),
                _ => None,
            })
            .collect();
        assert_eq!(idents.len(), 3);
        assert_eq!(idents[0], idents[2]);
        assert_ne!(idents[0], idents[1]);
    }
}
