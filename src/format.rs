use std::fmt;

use crate::value::Value;

/// Integral numbers print without a fractional part (`123`, not `123.0`).
pub fn format_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 {
        format!("{:.0}", number)
    } else {
        number.to_string()
    }
}

/// Plain text form: strings unquoted at the top level. Used for `+`
/// concatenation and `join`.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.to_string(),
        Value::List(map) => {
            let items: Vec<String> = map.values().map(render).collect();
            format!("({})", items.join(", "))
        }
        Value::Closure(_) => "<closure>".to_string(),
        Value::Native(_) => "<native fn>".to_string(),
    }
}

/// Rendering used by `print`: strings quoted, lists as `(v1, v2)` by value only.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        _ => value_to_string(value),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&value_to_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordered_map::{Key, OrderedMap};
    use pretty_assertions::assert_eq;

    fn list(values: Vec<(Key, Value)>) -> Value {
        Value::list(values.into_iter().collect::<OrderedMap>())
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(123.0), "123");
        assert_eq!(format_number(-4.0), "-4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1e21), "1000000000000000000000");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn test_render_scalars() {
        assert_eq!(render(&Value::Nil), "nil");
        assert_eq!(render(&Value::Bool(true)), "true");
        assert_eq!(render(&Value::Number(7.0)), "7");
        assert_eq!(render(&Value::string("hi")), "\"hi\"");
        assert_eq!(value_to_string(&Value::string("hi")), "hi");
    }

    #[test]
    fn test_render_tuple() {
        let tuple = list(vec![
            (Key::index(0), Value::Number(1.0)),
            (Key::index(1), Value::Number(2.0)),
            (Key::index(2), Value::Number(3.0)),
        ]);
        assert_eq!(render(&tuple), "(1, 2, 3)");
    }

    #[test]
    fn test_render_named_entries_by_value() {
        let record = list(vec![(Key::name("hello"), Value::string("world"))]);
        assert_eq!(render(&record), "(\"world\")");
        // nested strings stay quoted in the plain form too
        assert_eq!(value_to_string(&record), "(\"world\")");
    }

    #[test]
    fn test_render_nested() {
        let inner = list(vec![(Key::name("hello"), Value::string("world"))]);
        let outer = list(vec![
            (Key::index(0), Value::Number(1.0)),
            (Key::index(1), Value::Number(2.0)),
            (Key::index(2), Value::Number(3.0)),
            (Key::index(3), inner),
        ]);
        assert_eq!(render(&outer), "(1, 2, 3, (\"world\"))");
    }

    #[test]
    fn test_render_empty_list() {
        assert_eq!(render(&Value::list(OrderedMap::new())), "()");
    }
}
