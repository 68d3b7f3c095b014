use std::rc::Rc;

use crate::diagnostic::Span;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Greater,
    GreaterEq,
    Less,
    LessEq,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `true`, `false`, `nil`, numbers and strings
    Literal(Value),
    Grouping(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Variable(Rc<str>),
}

/// A call such as `print()` in `(1, 2).print()` or the free statement `range(1, 3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    pub callee: Expr,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// A parenthesised list and the `.name(...)` calls chained after it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListStmt {
    pub items: Vec<Stmt>,
    pub pipeline: Vec<CallStmt>,
    pub span: Span,
}

/// `(params) => { body }`
///
/// Parameters are either `Stmt::Expression` holding a bare variable or a
/// `Stmt::VariableDecl` whose initializer is the default value.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub parameters: Vec<Stmt>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl FunctionDecl {
    /// Parameter names with their optional default, in declaration order.
    pub fn params(&self) -> impl Iterator<Item = (&Rc<str>, Option<&Stmt>)> {
        self.parameters.iter().filter_map(|param| match param {
            Stmt::Expression(Expr {
                kind: ExprKind::Variable(name),
                ..
            }) => Some((name, None)),
            Stmt::VariableDecl {
                name, initializer, ..
            } => Some((name, initializer.as_deref())),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    VariableDecl {
        name: Rc<str>,
        initializer: Option<Box<Stmt>>,
        span: Span,
    },
    List(ListStmt),
    Call(CallStmt),
    FunctionDecl(Rc<FunctionDecl>),
    Return {
        value: Option<Box<Stmt>>,
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expression(expr) => expr.span,
            Stmt::VariableDecl { span, .. } | Stmt::Return { span, .. } => *span,
            Stmt::List(list) => list.span,
            Stmt::Call(call) => call.span,
            Stmt::FunctionDecl(decl) => decl.span,
        }
    }
}
