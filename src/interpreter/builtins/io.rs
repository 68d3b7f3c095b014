//! Output built-ins.

use std::io::Write;

use super::super::error::RuntimeError;
use super::super::Interpreter;
use crate::format::render;
use crate::value::{Arity, NativeFunction, Value};

/// `value.print()` writes the rendered caller and a newline.
#[derive(Debug)]
pub struct Print;

impl NativeFunction for Print {
    fn name(&self) -> &'static str {
        "print"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(0)
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        caller: Value,
        _args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let out = interpreter.output();
        // A closed pipe must not abort the program, so write failures are only logged.
        if let Err(error) = writeln!(out, "{}", render(&caller)).and_then(|_| out.flush()) {
            tracing::warn!(%error, "failed to write program output");
        }
        Ok(Value::Nil)
    }
}
