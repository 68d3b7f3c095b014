use crate::diagnostic::Span;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Colon,
    /// Virtual statement terminator inserted by the lexer at line ends.
    Semicolon,

    // Arithmetic Operators
    Plus,
    Minus,
    Star,
    Slash,

    // Comparison Operators
    DoubleEqual,
    BangEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Other Operators
    Bang,
    Equal,
    Question,
    /// `=>` - introduces a function body
    DoubleArrow,
    /// `++`
    Increment,
    /// `--`
    Decrement,
    /// `>>` - return from the enclosing function
    Return,

    // Literals and Identifiers
    Identifier,
    String,
    Number,
    True,
    False,
    Nil,

    Eof,
}

impl TokenKind {
    /// Whether a statement may legally end on a token of this kind, which makes
    /// it eligible for a terminator when a newline follows.
    pub fn ends_statement(self) -> bool {
        matches!(
            self,
            TokenKind::RightParen
                | TokenKind::String
                | TokenKind::Number
                | TokenKind::Identifier
                | TokenKind::Increment
                | TokenKind::Decrement
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Colon => "COLON",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::DoubleEqual => "DOUBLE_EQUAL",
            TokenKind::BangEqual => "BANG_EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::Bang => "BANG",
            TokenKind::Equal => "EQUAL",
            TokenKind::Question => "QUESTION",
            TokenKind::DoubleArrow => "DOUBLE_ARROW",
            TokenKind::Increment => "INCREMENT",
            TokenKind::Decrement => "DECREMENT",
            TokenKind::Return => "RETURN",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Nil => "NIL",
            TokenKind::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// The decoded value of a number or string literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(Rc<str>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Rc<str>,
    pub literal: Option<Literal>,
    pub line: usize,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<Rc<str>>, line: usize, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal: None,
            line,
            span,
        }
    }

    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Semicolon => write!(f, "{:>4} {} <newline>", self.line, self.kind),
            TokenKind::Eof => write!(f, "{:>4} {}", self.line, self.kind),
            _ => write!(f, "{:>4} {} {}", self.line, self.kind, self.lexeme),
        }
    }
}
