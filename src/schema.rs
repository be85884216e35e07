//! The schema value model.
//!
//! A JSON Schema document is either one of the two sentinel schemas — Accept
//! ("matches every instance", the boolean `true` form) and Reject ("matches
//! no instance", the boolean `false` form) — or a mapping from recognized
//! keyword names to arbitrary JSON payloads.
//!
//! Sentinel identity matters: canonical output represents Accept and Reject
//! by exactly one value each, so equivalence checks elsewhere in the engine
//! are exact matches rather than ad hoc structural reasoning. On the wire
//! (inside keyword payloads) the sentinels are stored as the JSON booleans
//! `true` and `false`; an empty JSON object is accepted as Accept on input
//! but never survives canonicalization.

use serde_json::{Map, Value};

/// A JSON Schema value: sentinel or keyword mapping.
///
/// Invariant: `Constrained` never holds an empty mapping — an empty mapping
/// is semantically identical to `Accept` and is normalized away by
/// [`Schema::from_map`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// The canonical "matches everything" sentinel (`true`).
    Accept,
    /// The canonical "matches nothing" sentinel (`false`).
    Reject,
    /// A keyword mapping with at least one entry.
    Constrained(Map<String, Value>),
}

impl Schema {
    /// Build a schema from a keyword mapping, normalizing the empty mapping
    /// to the `Accept` sentinel.
    pub fn from_map(map: Map<String, Value>) -> Self {
        if map.is_empty() {
            Schema::Accept
        } else {
            Schema::Constrained(map)
        }
    }

    /// Interpret a JSON value at a schema position.
    ///
    /// Returns `None` for values that are not schema-shaped (anything other
    /// than a boolean or an object); the caller reports the shape violation
    /// with its own keyword/path context.
    pub fn try_from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(true) => Some(Schema::Accept),
            Value::Bool(false) => Some(Schema::Reject),
            Value::Object(map) => Some(Schema::from_map(map.clone())),
            _ => None,
        }
    }

    /// Lower the schema back into its wire representation.
    pub fn into_value(self) -> Value {
        match self {
            Schema::Accept => Value::Bool(true),
            Schema::Reject => Value::Bool(false),
            Schema::Constrained(map) => Value::Object(map),
        }
    }

    pub fn is_accept(&self) -> bool {
        matches!(self, Schema::Accept)
    }

    pub fn is_reject(&self) -> bool {
        matches!(self, Schema::Reject)
    }
}

/// Accept-equivalence check for a keyword payload.
///
/// Canonicalized children store the Accept sentinel as `true`; the empty
/// object is also accepted because structural rules may inspect raw input
/// in unit tests before a child pass has run.
pub fn value_is_accept(value: &Value) -> bool {
    match value {
        Value::Bool(true) => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Reject-equivalence check for a keyword payload.
pub fn value_is_reject(value: &Value) -> bool {
    matches!(value, Value::Bool(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_mapping_normalizes_to_accept() {
        assert_eq!(Schema::from_map(Map::new()), Schema::Accept);
    }

    #[test]
    fn test_try_from_value_shapes() {
        assert_eq!(Schema::try_from_value(&json!(true)), Some(Schema::Accept));
        assert_eq!(Schema::try_from_value(&json!(false)), Some(Schema::Reject));
        assert_eq!(Schema::try_from_value(&json!({})), Some(Schema::Accept));
        assert!(matches!(
            Schema::try_from_value(&json!({"type": "string"})),
            Some(Schema::Constrained(_))
        ));
        assert_eq!(Schema::try_from_value(&json!(42)), None);
        assert_eq!(Schema::try_from_value(&json!("x")), None);
        assert_eq!(Schema::try_from_value(&json!([])), None);
    }

    #[test]
    fn test_sentinel_wire_forms() {
        assert_eq!(Schema::Accept.into_value(), json!(true));
        assert_eq!(Schema::Reject.into_value(), json!(false));
    }

    #[test]
    fn test_equivalence_checks() {
        assert!(value_is_accept(&json!(true)));
        assert!(value_is_accept(&json!({})));
        assert!(!value_is_accept(&json!(false)));
        assert!(!value_is_accept(&json!({"type": "null"})));
        assert!(value_is_reject(&json!(false)));
        assert!(!value_is_reject(&json!({})));
    }
}
