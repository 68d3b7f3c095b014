use crate::ast::{BinaryOp, CallStmt, Expr, ExprKind, FunctionDecl, ListStmt, Stmt, UnaryOp};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Literal, Token, TokenKind};
use crate::value::Value;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct ParseError {
    pub line: usize,
    /// ` at end`, ` at end of line` or ` at '<lexeme>'`
    pub location: String,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        let location = match token.kind {
            TokenKind::Eof => " at end".to_string(),
            TokenKind::Semicolon => " at end of line".to_string(),
            _ => format!(" at '{}'", token.lexeme),
        };
        Self {
            line: token.line,
            location,
            message: message.into(),
            span: token.span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let found = self.location.trim_start().trim_start_matches("at ");
        Diagnostic::error(self.message.clone())
            .with_code("E0101")
            .with_label(Label::primary(self.span, format!("found {}", found)))
    }
}

pub fn parse(tokens: Vec<Token>) -> Result<Vec<Stmt>, ParseError> {
    Parser::new(tokens).parse()
}

/// How deeply lists, blocks and operands may nest before parsing gives up.
pub const MAX_NESTING: usize = 256;

/// Recursive-descent parser over the lexer's token stream. Stops at the first
/// error.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|token| token.is(TokenKind::Eof)) {
            let (line, end) = tokens
                .last()
                .map_or((1, 0), |token| (token.line, token.span.end));
            tokens.push(Token::new(TokenKind::Eof, "", line, Span::new(end, end)));
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if self.match_kind(TokenKind::Semicolon) {
                continue;
            }
            statements.push(self.declaration()?);
        }
        tracing::debug!(statements = statements.len(), "parsed program");
        Ok(statements)
    }

    fn declaration(&mut self) -> Result<Stmt, ParseError> {
        self.nested(Self::declaration_inner)
    }

    fn declaration_inner(&mut self) -> Result<Stmt, ParseError> {
        if self.check(TokenKind::LeftParen) {
            let open = self.advance();
            return self.iterable(open.span);
        }

        if self.check_sequence(TokenKind::Identifier, TokenKind::Colon) {
            let name = self.advance();
            self.advance();
            return self.variable_declaration(name);
        }

        self.statement()
    }

    fn variable_declaration(&mut self, name: Token) -> Result<Stmt, ParseError> {
        let initializer = if self.check_any(&[
            TokenKind::RightParen,
            TokenKind::RightBrace,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]) {
            None
        } else {
            Some(Box::new(self.declaration()?))
        };

        let span = initializer
            .as_ref()
            .map_or(name.span, |init| name.span.merge(init.span()));
        Ok(Stmt::VariableDecl {
            name: name.lexeme,
            initializer,
            span,
        })
    }

    /// Everything after an opening `(`: the items, the closing `)`, then either a
    /// function body or a pipeline of chained calls.
    fn iterable(&mut self, open: Span) -> Result<Stmt, ParseError> {
        // Commas are separators, not requirements: items may also be split
        // across lines.
        let mut items = Vec::new();
        while !self.check(TokenKind::RightParen) && !self.is_at_end() {
            if self.match_any(&[TokenKind::Comma, TokenKind::Semicolon]) {
                continue;
            }
            let start = self.current;
            items.push((start, self.declaration()?));
        }
        let close = self.consume(TokenKind::RightParen, "expected ')' after list items")?;

        if self.check_sequence(TokenKind::DoubleArrow, TokenKind::LeftBrace) {
            self.current += 2;
            return self.function_declaration(open, items);
        }

        let mut pipeline = Vec::new();
        while self.check_sequence(TokenKind::Dot, TokenKind::Identifier) {
            self.advance();
            pipeline.push(self.call()?);
        }

        if !self.check_any(&[
            TokenKind::RightParen,
            TokenKind::RightBrace,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]) {
            return Err(ParseError::at(self.peek(), "expected ',' or ')' after list"));
        }
        self.expect_semicolon();

        let end = pipeline.last().map_or(close.span, |call| call.span);
        Ok(Stmt::List(ListStmt {
            items: items.into_iter().map(|(_, item)| item).collect(),
            pipeline,
            span: open.merge(end),
        }))
    }

    fn function_declaration(&mut self, open: Span, items: Vec<(usize, Stmt)>) -> Result<Stmt, ParseError> {
        let mut parameters = Vec::with_capacity(items.len());
        for (start, item) in items {
            match item {
                Stmt::Expression(Expr {
                    kind: ExprKind::Variable(_),
                    ..
                })
                | Stmt::VariableDecl { .. } => parameters.push(item),
                _ => return Err(ParseError::at(self.token_at(start), "expected parameter name")),
            }
        }

        let body = self.block()?;
        let close = self.previous().span;
        Ok(Stmt::FunctionDecl(Rc::new(FunctionDecl {
            parameters,
            body,
            span: open.merge(close),
        })))
    }

    fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if self.match_kind(TokenKind::Semicolon) {
                continue;
            }
            statements.push(self.declaration()?);
        }
        self.consume(TokenKind::RightBrace, "expected '}' after block")?;
        Ok(statements)
    }

    fn call(&mut self) -> Result<CallStmt, ParseError> {
        let callee = self.primary()?;
        self.consume(TokenKind::LeftParen, "expected '(' after function name")?;

        let mut arguments = Vec::new();
        while !self.check(TokenKind::RightParen) && !self.is_at_end() {
            if self.match_any(&[TokenKind::Comma, TokenKind::Semicolon]) {
                continue;
            }
            arguments.push(self.expression()?);
        }
        let close = self.consume(TokenKind::RightParen, "expected ')' after arguments")?;

        Ok(CallStmt {
            span: callee.span.merge(close.span),
            callee,
            arguments,
        })
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.check(TokenKind::Return) {
            return self.return_statement();
        }

        if self.check_sequence(TokenKind::Identifier, TokenKind::LeftParen) {
            let call = self.call()?;
            self.expect_semicolon();
            return Ok(Stmt::Call(call));
        }

        let expr = self.expression()?;
        self.expect_semicolon();
        Ok(Stmt::Expression(expr))
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        let value = if self.check_any(&[
            TokenKind::Semicolon,
            TokenKind::RightBrace,
            TokenKind::RightParen,
            TokenKind::Comma,
            TokenKind::Eof,
        ]) {
            None
        } else {
            Some(Box::new(self.declaration()?))
        };
        self.expect_semicolon();

        let span = value
            .as_ref()
            .map_or(keyword.span, |value| keyword.span.merge(value.span()));
        Ok(Stmt::Return { value, span })
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.binary_expr(1)
    }

    fn token_to_binary_operator(kind: TokenKind) -> Option<(u8, BinaryOp)> {
        match kind {
            TokenKind::DoubleEqual => Some((1, BinaryOp::Eq)),
            TokenKind::BangEqual => Some((1, BinaryOp::NotEq)),
            TokenKind::Greater => Some((2, BinaryOp::Greater)),
            TokenKind::GreaterEqual => Some((2, BinaryOp::GreaterEq)),
            TokenKind::Less => Some((2, BinaryOp::Less)),
            TokenKind::LessEqual => Some((2, BinaryOp::LessEq)),
            TokenKind::Plus => Some((3, BinaryOp::Add)),
            TokenKind::Minus => Some((3, BinaryOp::Sub)),
            TokenKind::Star => Some((4, BinaryOp::Mul)),
            TokenKind::Slash => Some((4, BinaryOp::Div)),
            _ => None,
        }
    }

    fn binary_expr(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut left = self.unary()?;

        while let Some((precedence, op)) = Self::token_to_binary_operator(self.peek().kind) {
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let right = self.binary_expr(precedence + 1)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::unary_inner)
    }

    fn unary_inner(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.primary(),
        };
        let start = self.advance().span;
        let operand = self.unary()?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        let kind = match token.kind {
            TokenKind::True => ExprKind::Literal(Value::Bool(true)),
            TokenKind::False => ExprKind::Literal(Value::Bool(false)),
            TokenKind::Nil => ExprKind::Literal(Value::Nil),
            TokenKind::Number | TokenKind::String => ExprKind::Literal(literal_value(&token)),
            TokenKind::Identifier => ExprKind::Variable(Rc::clone(&token.lexeme)),
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                let close = self.consume(TokenKind::RightParen, "expected ')' after expression")?;
                return Ok(Expr::new(
                    ExprKind::Grouping(Box::new(inner)),
                    token.span.merge(close.span),
                ));
            }
            _ => return Err(ParseError::at(&token, "expect expression")),
        };
        self.advance();
        Ok(Expr::new(kind, token.span))
    }

    /// Runs one level of recursive descent, bounded by [`MAX_NESTING`].
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::at(self.peek(), "nesting too deep"));
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    // Token helpers

    fn peek(&self) -> &Token {
        self.token_at(self.current)
    }

    fn previous(&self) -> &Token {
        self.token_at(self.current.saturating_sub(1))
    }

    /// `new` guarantees a trailing `Eof`, so out-of-range indices clamp to it.
    fn token_at(&self, index: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[index.min(last)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().is(TokenKind::Eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is(kind)
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|kind| self.check(*kind))
    }

    fn check_sequence(&self, first: TokenKind, second: TokenKind) -> bool {
        self.check(first) && self.token_at(self.current + 1).is(second)
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|kind| self.match_kind(*kind))
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::at(self.peek(), message))
        }
    }

    /// Consumes a terminator if the lexer emitted one here. Never fails.
    fn expect_semicolon(&mut self) {
        self.match_kind(TokenKind::Semicolon);
    }
}

fn literal_value(token: &Token) -> Value {
    match &token.literal {
        Some(Literal::Number(number)) => Value::Number(*number),
        Some(Literal::String(text)) => Value::String(Rc::clone(text)),
        None => Value::Nil,
    }
}
