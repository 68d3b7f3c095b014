use crate::interpreter::error::RuntimeError;
use crate::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// One lexical scope, linked to the scope that encloses it.
///
/// Scopes are created when evaluation enters a nested list or a closure call and
/// dropped when it leaves, unless a closure captured them.
#[derive(Debug, Default)]
pub struct Environment {
    values: RefCell<FxHashMap<Rc<str>, Value>>,
    enclosing: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: Rc<Environment>) -> Self {
        Self {
            values: RefCell::default(),
            enclosing: Some(enclosing),
        }
    }

    /// Binds `name` here and, if an enclosing scope already binds it, overwrites
    /// the nearest such binding as well.
    pub fn define(&self, name: Rc<str>, value: Value) {
        if let Some(owner) = self.enclosing.as_deref().and_then(|env| env.find(&name)) {
            owner.values.borrow_mut().insert(Rc::clone(&name), value.clone());
        }
        self.values.borrow_mut().insert(name, value);
    }

    /// Binds `name` in this scope only.
    pub fn bind(&self, name: Rc<str>, value: Value) {
        self.values.borrow_mut().insert(name, value);
    }

    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        self.lookup(name)
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    /// Searches from this scope outwards.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.find(name)
            .and_then(|env| env.values.borrow().get(name).cloned())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.borrow().contains_key(name)
    }

    fn find(&self, name: &str) -> Option<&Environment> {
        if self.contains(name) {
            return Some(self);
        }
        self.enclosing.as_deref().and_then(|env| env.find(name))
    }
}
