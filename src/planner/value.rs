//! Structural equality and canonical rendering for dynamic plan values.

use serde_json::{Number, Value};

/// Compares two values structurally.
///
/// Numbers compare by numeric value, so `1` and `1.0` are equal. Object key
/// order never matters.
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => false,
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Renders a value for display in a diff line.
///
/// Absent and `null` values render as `null`; everything else is compact JSON.
#[must_use]
pub fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::from("null"),
        Some(v) => serde_json::to_string(v).unwrap_or_else(|_| v.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_compare_numerically() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!(-3), &json!(-3)));
        assert!(!values_equal(&json!(1), &json!(2)));
        assert!(!values_equal(&json!(1), &json!("1")));
    }

    #[test]
    fn test_nested_structures() {
        let a = json!({"tags": {"env": "prod", "team": "core"}, "ports": [80, 443]});
        let b = json!({"ports": [80, 443.0], "tags": {"team": "core", "env": "prod"}});
        assert!(values_equal(&a, &b));

        let c = json!({"ports": [443, 80], "tags": {"team": "core", "env": "prod"}});
        assert!(!values_equal(&a, &c));
    }

    #[test]
    fn test_object_key_sets_must_match() {
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": null})));
        assert!(!values_equal(&json!([]), &json!({})));
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(None), "null");
        assert_eq!(render_value(Some(&Value::Null)), "null");
        assert_eq!(render_value(Some(&json!("ami-123"))), "\"ami-123\"");
        assert_eq!(render_value(Some(&json!({"b": 1, "a": [true]}))), r#"{"a":[true],"b":1}"#);
    }
}
