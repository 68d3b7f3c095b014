//! Miscellaneous built-ins.

use super::super::error::RuntimeError;
use super::super::Interpreter;
use crate::value::{Arity, NativeFunction, Value};

/// `(a, b).call(fn)` invokes `fn` with the piped-in list spread as its
/// positional arguments.
#[derive(Debug)]
pub struct Call;

impl NativeFunction for Call {
    fn name(&self) -> &'static str {
        "call"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        caller: Value,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let function = args.into_iter().next().unwrap_or(Value::Nil);
        interpreter.call_value(&function, caller, Vec::new())
    }
}
