use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::rc::Rc;

use crate::format::format_number;
use crate::value::Value;

/// Key of a list entry: a position or range value, or a declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Number(OrderedFloat<f64>),
    Name(Rc<str>),
}

impl Key {
    pub fn index(index: usize) -> Self {
        Key::Number(OrderedFloat(index as f64))
    }

    pub fn name(name: &str) -> Self {
        Key::Name(Rc::from(name))
    }
}

impl From<f64> for Key {
    fn from(number: f64) -> Self {
        Key::Number(OrderedFloat(number))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Number(number) => f.write_str(&format_number(number.0)),
            Key::Name(name) => f.write_str(name),
        }
    }
}

/// Insertion-ordered associative container backing every list value.
///
/// Setting an existing key replaces its value in place; removal keeps the
/// relative order of the remaining entries. `clone` is the shallow copy: a new
/// map whose entries refer to the same element values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedMap {
    entries: IndexMap<Key, Value, FxBuildHasher>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(capacity, FxBuildHasher),
        }
    }

    pub fn set(&mut self, key: Key, value: Value) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Entry at a zero-based insertion position.
    pub fn get_index(&self, index: usize) -> Option<(&Key, &Value)> {
        self.entries.get_index(index)
    }

    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }
}

impl FromIterator<(Key, Value)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}
