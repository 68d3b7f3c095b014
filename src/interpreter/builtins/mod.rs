//! Built-in functions for the tim interpreter.
//!
//! Every built-in receives the value piped into it (the "caller") plus its
//! explicit arguments:
//! - **IO**: `print`
//! - **List**: `join`, `get`
//! - **Generators**: `range`
//! - **Misc**: `call`

mod generators;
mod io;
mod list;
mod misc;

pub use generators::Range;
pub use io::Print;
pub use list::{Get, Join};
pub use misc::Call;

use super::environment::Environment;
use super::error::RuntimeError;
use crate::ordered_map::OrderedMap;
use crate::value::{NativeFunction, Value};
use std::rc::Rc;

pub fn natives() -> Vec<Rc<dyn NativeFunction>> {
    vec![
        Rc::new(Print),
        Rc::new(Join),
        Rc::new(Get),
        Rc::new(Range),
        Rc::new(Call),
    ]
}

/// Binds every built-in in `globals` under its own name.
pub fn register(globals: &Environment) {
    for native in natives() {
        globals.bind(Rc::from(native.name()), Value::Native(native));
    }
}

fn expect_list<'v>(function: &str, caller: &'v Value) -> Result<&'v OrderedMap, RuntimeError> {
    caller.as_list().ok_or_else(|| {
        RuntimeError::invalid_argument(
            function,
            format!("expected a list to be piped in, found {}", caller.type_name()),
        )
    })
}

fn expect_number(function: &str, value: &Value) -> Result<f64, RuntimeError> {
    value.as_number().ok_or_else(|| {
        RuntimeError::invalid_argument(
            function,
            format!("expected a number, found {}", value.type_name()),
        )
    })
}
