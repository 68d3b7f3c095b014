use crate::value::Value;

/// Outcome of executing a statement: a plain value, or a `>>` unwinding to the
/// enclosing function body.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Value(Value),
    Return(Value),
}

impl ControlFlow {
    pub fn into_value(self) -> Value {
        match self {
            ControlFlow::Value(value) | ControlFlow::Return(value) => value,
        }
    }
}
