use std::fmt;
use std::rc::Rc;

use crate::ast::FunctionDecl;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::Interpreter;
use crate::ordered_map::OrderedMap;

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    List(Rc<OrderedMap>),
    Closure(Rc<Closure>),
    Native(Rc<dyn NativeFunction>),
}

/// Structural comparison, used by tests and by list comparison. The language's
/// own `==` lives in the evaluator and compares lists by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::List(left), Value::List(right)) => left == right,
            (Value::Closure(left), Value::Closure(right)) => Rc::ptr_eq(left, right),
            (Value::Native(left), Value::Native(right)) => same_native(left, right),
            _ => false,
        }
    }
}

pub(crate) fn same_native(left: &Rc<dyn NativeFunction>, right: &Rc<dyn NativeFunction>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(left), Rc::as_ptr(right))
}

impl Value {
    pub fn string(text: &str) -> Self {
        Value::String(Rc::from(text))
    }

    pub fn list(map: OrderedMap) -> Self {
        Value::List(Rc::new(map))
    }

    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(number) = self {
            Some(*number)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&OrderedMap> {
        if let Value::List(map) = self {
            Some(map)
        } else {
            None
        }
    }

    /// `nil` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Nil => false,
            _ => true,
        }
    }

    /// The zero value of each scalar type: `0`, `""`, `false` and `nil`.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Bool(b) => !b,
            Value::Number(n) => *n == 0.0,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Closure(_) => "closure",
            Value::Native(_) => "native function",
        }
    }
}

/// A function literal together with the environment it was evaluated in.
pub struct Closure {
    pub decl: Rc<FunctionDecl>,
    pub env: Rc<Environment>,
    pub name: Option<Rc<str>>,
}

impl Closure {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<closure>")
    }
}

// The captured environment usually contains the closure itself.
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.name)
            .field("parameters", &self.decl.parameters.len())
            .finish_non_exhaustive()
    }
}

/// Inclusive bounds on the number of explicit arguments a native accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    pub const fn exactly(count: usize) -> Self {
        Self { min: count, max: count }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// A built-in function. `caller` is the value piped into the call (`nil` for a
/// free call); `args` are the evaluated explicit arguments, already checked
/// against `arity`.
pub trait NativeFunction: fmt::Debug {
    fn name(&self) -> &'static str;

    fn arity(&self) -> Arity;

    fn call(
        &self,
        interpreter: &mut Interpreter,
        caller: Value,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(Value::list(OrderedMap::new()).is_truthy());
    }

    #[test]
    fn test_zero_values() {
        assert!(Value::Nil.is_zero());
        assert!(Value::Bool(false).is_zero());
        assert!(Value::Number(0.0).is_zero());
        assert!(Value::Number(-0.0).is_zero());
        assert!(Value::string("").is_zero());
        assert!(!Value::Number(0.5).is_zero());
        assert!(!Value::string("0").is_zero());
        assert!(!Value::list(OrderedMap::new()).is_zero());
    }
}
