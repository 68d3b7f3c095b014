//! Built-ins that read from the piped-in list.

use super::super::error::RuntimeError;
use super::super::Interpreter;
use super::expect_list;
use crate::format::value_to_string;
use crate::ordered_map::Key;
use crate::value::{Arity, NativeFunction, Value};

/// `list.join(delimiter?)`: the values' plain text forms joined together.
#[derive(Debug)]
pub struct Join;

impl NativeFunction for Join {
    fn name(&self) -> &'static str {
        "join"
    }

    fn arity(&self) -> Arity {
        Arity::range(0, 1)
    }

    fn call(
        &self,
        _interpreter: &mut Interpreter,
        caller: Value,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let delimiter = match args.first() {
            None => "",
            Some(Value::String(delimiter)) => delimiter.as_ref(),
            Some(other) => {
                return Err(RuntimeError::invalid_argument(
                    self.name(),
                    format!("delimiter must be a string, found {}", other.type_name()),
                ))
            }
        };
        let list = expect_list(self.name(), &caller)?;
        let parts: Vec<String> = list.values().map(value_to_string).collect();
        Ok(Value::string(&parts.join(delimiter)))
    }
}

/// `list.get(selector)`: a number selects by zero-based position, a string by
/// declared name. Missing entries are `nil`.
#[derive(Debug)]
pub struct Get;

impl NativeFunction for Get {
    fn name(&self) -> &'static str {
        "get"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn call(
        &self,
        _interpreter: &mut Interpreter,
        caller: Value,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let list = expect_list(self.name(), &caller)?;
        let found = match args.first() {
            Some(Value::Number(index)) if *index >= 0.0 && index.fract() == 0.0 => {
                list.get_index(*index as usize).map(|(_, value)| value)
            }
            Some(Value::Number(_)) => None,
            Some(Value::String(name)) => list.get(&Key::Name(name.clone())),
            Some(other) => {
                return Err(RuntimeError::invalid_argument(
                    self.name(),
                    format!("selector must be a number or string, found {}", other.type_name()),
                ))
            }
            None => None,
        };
        Ok(found.cloned().unwrap_or(Value::Nil))
    }
}
