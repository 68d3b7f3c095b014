use crate::diagnostic::{line_col, Diagnostic, Label, Span};
use crate::token::{Literal, Token, TokenKind};
use chumsky::prelude::*;
use std::rc::Rc;
use thiserror::Error;

/// A token kind paired with its decoded literal, before positions are attached.
type Lexed = (TokenKind, Option<Literal>);

#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] unsupported character '{character}' at position {position}")]
pub struct LexError {
    pub character: char,
    pub position: usize,
    pub line: usize,
    pub span: Span,
}

impl LexError {
    fn at(source: &str, position: usize) -> Self {
        let character = source
            .get(position..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('\0');
        let (line, _) = line_col(source, position);
        Self {
            character,
            position,
            line,
            span: Span::new(position, position + character.len_utf8()),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(format!("unsupported character `{}`", self.character.escape_debug()))
            .with_code("E0001")
            .with_label(Label::primary(self.span, "not recognised by the lexer"))
    }
}

pub fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<(Lexed, SimpleSpan)>, extra::Err<Simple<'a, char>>> {
    // A '.' is only part of a number when digits follow it, so `1.print` stays
    // three tokens.
    let number = text::digits(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .map(|s: &str| {
            let value = s.parse::<f64>().unwrap_or_default();
            (TokenKind::Number, Some(Literal::Number(value)))
        });

    // Unterminated strings run to the end of the input.
    let string = just('"')
        .ignore_then(none_of("\"").repeated().to_slice())
        .then_ignore(just('"').or_not())
        .map(|s: &str| (TokenKind::String, Some(Literal::String(Rc::from(s)))));

    // letter (letter | digit)*; `_` is not part of the alphabet.
    let ident = any()
        .filter(|c: &char| c.is_alphabetic())
        .then(any().filter(|c: &char| c.is_alphanumeric()).repeated())
        .to_slice()
        .map(|s: &str| match s {
            "true" => (TokenKind::True, None),
            "false" => (TokenKind::False, None),
            "nil" => (TokenKind::Nil, None),
            _ => (TokenKind::Identifier, None),
        });

    let op_double = choice((
        just("==").to(TokenKind::DoubleEqual),
        just("!=").to(TokenKind::BangEqual),
        just("<=").to(TokenKind::LessEqual),
        just(">=").to(TokenKind::GreaterEqual),
        just("=>").to(TokenKind::DoubleArrow),
        just("++").to(TokenKind::Increment),
        just("--").to(TokenKind::Decrement),
        just(">>").to(TokenKind::Return),
    ));

    let op_single = choice((
        just('(').to(TokenKind::LeftParen),
        just(')').to(TokenKind::RightParen),
        just('{').to(TokenKind::LeftBrace),
        just('}').to(TokenKind::RightBrace),
        just(',').to(TokenKind::Comma),
        just('.').to(TokenKind::Dot),
        just(':').to(TokenKind::Colon),
        just('+').to(TokenKind::Plus),
        just('-').to(TokenKind::Minus),
        just('*').to(TokenKind::Star),
        just('/').to(TokenKind::Slash),
        just('?').to(TokenKind::Question),
        just('!').to(TokenKind::Bang),
        just('=').to(TokenKind::Equal),
        just('<').to(TokenKind::Less),
        just('>').to(TokenKind::Greater),
    ));

    let op = op_double.or(op_single).map(|kind| (kind, None));

    let token = number
        .or(string)
        .or(ident)
        .or(op)
        .map_with(|tok, e| (tok, e.span()));

    token
        .padded()
        .repeated()
        .collect()
        .padded()
        .then_ignore(end())
}

/// Converts source text into tokens, inserting a virtual `Semicolon` after any
/// token that can end a statement when a newline follows it. The stream always
/// ends with `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let raw = lexer().parse(source).into_result().map_err(|errors| {
        let position = errors
            .first()
            .map_or(source.len(), |error| error.span().start);
        LexError::at(source, position)
    })?;

    let mut tokens = Vec::with_capacity(raw.len() + raw.len() / 4 + 1);
    let mut line = 1;
    let mut cursor = 0;
    let mut iter = raw.into_iter().peekable();

    while let Some(((kind, literal), span)) = iter.next() {
        line += count_newlines(slice(source, cursor, span.start));
        let lexeme = slice(source, span.start, span.end);
        let mut token = Token::new(kind, lexeme, line, Span::new(span.start, span.end));
        if let Some(literal) = literal {
            token = token.with_literal(literal);
        }
        tokens.push(token);
        line += count_newlines(lexeme);
        cursor = span.end;

        let next = iter.peek();
        let gap_end = next.map_or(source.len(), |(_, next_span)| next_span.start);
        let continues_on_next_line = matches!(next, Some(((TokenKind::Dot, _), _)));
        if !kind.ends_statement() || continues_on_next_line {
            continue;
        }
        if let Some(offset) = slice(source, span.end, gap_end).find('\n') {
            let at = span.end + offset;
            tokens.push(Token::new(TokenKind::Semicolon, "\n", line, Span::new(at, at + 1)));
        }
    }

    line += count_newlines(slice(source, cursor, source.len()));
    tokens.push(Token::new(
        TokenKind::Eof,
        "",
        line,
        Span::new(source.len(), source.len()),
    ));

    tracing::debug!(tokens = tokens.len(), lines = line, "tokenized source");
    Ok(tokens)
}

fn slice(source: &str, start: usize, end: usize) -> &str {
    source.get(start..end).unwrap_or_default()
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}
