//! Built-ins that produce new lists.

use super::super::error::RuntimeError;
use super::super::Interpreter;
use super::expect_number;
use crate::ordered_map::{Key, OrderedMap};
use crate::value::{Arity, NativeFunction, Value};

const MAX_RANGE_LEN: f64 = 10_000_000.0;

/// `range(min, max)`: every number from `min` to `max` inclusive, stepping by
/// one. Each number is both key and value.
#[derive(Debug)]
pub struct Range;

impl NativeFunction for Range {
    fn name(&self) -> &'static str {
        "range"
    }

    fn arity(&self) -> Arity {
        Arity::exactly(2)
    }

    fn call(
        &self,
        _interpreter: &mut Interpreter,
        _caller: Value,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let (Some(min), Some(max)) = (args.first(), args.get(1)) else {
            return Err(RuntimeError::too_few_arguments(self.name(), 2));
        };
        let min = expect_number(self.name(), min)?;
        let max = expect_number(self.name(), max)?;
        if !min.is_finite() || !max.is_finite() {
            return Err(RuntimeError::invalid_argument(self.name(), "bounds must be finite"));
        }

        let len = if max < min { 0.0 } else { (max - min).floor() + 1.0 };
        if len > MAX_RANGE_LEN {
            return Err(RuntimeError::invalid_argument(
                self.name(),
                format!("range of {} numbers is too large", len),
            ));
        }

        let len = len as usize;
        let mut map = OrderedMap::with_capacity(len);
        for step in 0..len {
            let number = min + step as f64;
            map.set(Key::from(number), Value::Number(number));
        }
        Ok(Value::list(map))
    }
}
