pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod format;
pub mod interpreter;
pub mod lexer;
pub mod ordered_map;
pub mod stack;
pub mod token;
pub mod value;

pub use ast::{Expr, ExprKind, Stmt};
pub use interpreter::{Error, Interpreter, ParseError, RuntimeError};
pub use lexer::{tokenize, LexError};
pub use ordered_map::{Key, OrderedMap};
pub use token::{Token, TokenKind};
pub use value::Value;

use std::io::Write;

/// Lexes, parses and evaluates `source`, printing to stdout.
pub fn run(source: &str) -> Result<Vec<Value>, Error> {
    run_in(&mut Interpreter::new(), source)
}

/// Like [`run`], with `print` output sent to `out`.
pub fn run_with_output(source: &str, out: impl Write + 'static) -> Result<Vec<Value>, Error> {
    run_in(&mut Interpreter::with_output(Box::new(out)), source)
}

/// Runs `source` in an existing interpreter, keeping its top-level bindings.
pub fn run_in(interpreter: &mut Interpreter, source: &str) -> Result<Vec<Value>, Error> {
    let tokens = tokenize(source)?;
    let statements = interpreter::parse(tokens)?;
    Ok(interpreter.interpret(&statements)?)
}
