//! Canonicalization pass modules.
//!
//! Each full pass over a node runs in order: structural normalization →
//! type possibility analysis → type-to-schema projection. The driver
//! re-applies the pass until the node stabilizes.

pub mod projection;
pub mod structural;
pub mod type_analysis;

use serde_json::{Map, Value};

use crate::error::CanonError;

/// Read a keyword that must hold a non-negative integer (JSON Schema allows
/// the `5.0` spelling). `None` when the keyword is absent.
pub(crate) fn get_uint(
    map: &Map<String, Value>,
    keyword: &str,
    path: &str,
) -> Result<Option<u64>, CanonError> {
    let Some(value) = map.get(keyword) else {
        return Ok(None);
    };
    let parsed = match value.as_u64() {
        Some(n) => Some(n),
        None => value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0)
            .map(|f| f as u64),
    };
    parsed.map(Some).ok_or_else(|| CanonError::InvalidShape {
        path: path.to_string(),
        keyword: keyword.to_string(),
        expected: "a non-negative integer",
    })
}

/// Lower an `f64` into a JSON number, preferring the integer representation
/// for integral values so `5.0` and `5` canonicalize identically.
pub(crate) fn number_value(x: f64) -> Value {
    if x.fract() == 0.0 && x >= i64::MIN as f64 && x <= i64::MAX as f64 {
        Value::from(x as i64)
    } else {
        Value::from(x)
    }
}

/// Instance equality per JSON Schema: numbers compare by mathematical value
/// (`1` equals `1.0`), not by serde_json's representation-sensitive `Eq`.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_uint_accepts_integral_float() {
        let map = json!({"minItems": 3.0});
        let map = map.as_object().unwrap();
        assert_eq!(get_uint(map, "minItems", "#").unwrap(), Some(3));
        assert_eq!(get_uint(map, "maxItems", "#").unwrap(), None);
    }

    #[test]
    fn test_get_uint_rejects_bad_shapes() {
        for bad in [json!({"minItems": "3"}), json!({"minItems": 2.5}), json!({"minItems": -1})] {
            assert!(get_uint(bad.as_object().unwrap(), "minItems", "#").is_err());
        }
    }

    #[test]
    fn test_number_value_normalizes_integral_floats() {
        assert_eq!(number_value(5.0), json!(5));
        assert_eq!(number_value(-5.0), json!(-5));
        assert_eq!(number_value(2.5), json!(2.5));
    }

    #[test]
    fn test_values_equal_compares_numbers_mathematically() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!(1.5)));
        assert!(values_equal(&json!([1, "a"]), &json!([1.0, "a"])));
        assert!(values_equal(&json!({"n": 2}), &json!({"n": 2.0})));
        assert!(!values_equal(&json!({"n": 2}), &json!({"m": 2})));
        assert!(!values_equal(&json!(null), &json!(0)));
    }
}
