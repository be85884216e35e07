//! Static keyword tables for draft-07-class JSON Schema.
//!
//! Two tables drive the engine: `SCHEMA_KEYS` is the whitelist of all
//! recognized keywords (anything outside it passes through every node
//! unexamined — forward-compatibility policy), and `SCHEMA_OBJECT_KEYS` is
//! the subset whose value is itself a mapping of sub-keys to sub-schemas and
//! therefore needs recursive treatment of each mapped value.
//!
//! The remaining tables group keywords by the primitive type family they
//! constrain; the type possibility analyzer drops a whole family once its
//! governing type has been eliminated.

/// All recognized draft-07 keywords. Unknown keywords pass through unexamined.
pub const SCHEMA_KEYS: &[&str] = &[
    "$schema",
    "$id",
    "$ref",
    "const",
    "enum",
    "type",
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "format",
    "items",
    "additionalItems",
    "maxItems",
    "minItems",
    "uniqueItems",
    "contains",
    "maxProperties",
    "minProperties",
    "required",
    "properties",
    "patternProperties",
    "additionalProperties",
    "dependencies",
    "propertyNames",
    "if",
    "then",
    "else",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "contentEncoding",
    "contentMediaType",
    "definitions",
    "title",
    "description",
    "default",
    "examples",
    "$comment",
    "readOnly",
    "writeOnly",
    "deprecated",
];

/// Keywords whose value is a mapping of sub-keys to sub-schemas.
/// `dependencies` entries may also be arrays of property names; those pass
/// through unchanged.
pub const SCHEMA_OBJECT_KEYS: &[&str] = &["properties", "patternProperties", "dependencies"];

/// Keywords whose value is a single sub-schema.
pub const SINGLE_SCHEMA_KEYS: &[&str] = &[
    "additionalItems",
    "additionalProperties",
    "propertyNames",
    "contains",
    "not",
];

/// Keywords whose value is an ordered sequence of sub-schemas.
/// `items` also belongs here in its tuple form; it is handled separately
/// because it is single-schema in its other form.
pub const SEQUENCE_SCHEMA_KEYS: &[&str] = &["allOf", "anyOf", "oneOf"];

/// Annotation keywords that never affect validation.
pub const ANNOTATION_KEYS: &[&str] = &[
    "title",
    "description",
    "$comment",
    "examples",
    "default",
    "readOnly",
    "writeOnly",
    "deprecated",
];

/// Keywords meaningful only when `integer` or `number` is a live type.
pub const NUMERIC_KEYS: &[&str] = &[
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
];

/// Keywords meaningful only when `string` is a live type.
pub const STRING_KEYS: &[&str] = &[
    "maxLength",
    "minLength",
    "pattern",
    "format",
    "contentEncoding",
    "contentMediaType",
];

/// Keywords meaningful only when `array` is a live type.
///
/// `contains` is deliberately absent: the analyzer retains it in the
/// remainder when `array` is eliminated (an explicit unsatisfiability
/// marker for downstream tooling).
pub const ARRAY_KEYS: &[&str] = &[
    "items",
    "additionalItems",
    "maxItems",
    "minItems",
    "uniqueItems",
];

/// Keywords meaningful only when `object` is a live type.
pub const OBJECT_KEYS: &[&str] = &[
    "maxProperties",
    "minProperties",
    "required",
    "properties",
    "patternProperties",
    "additionalProperties",
    "dependencies",
    "propertyNames",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_tables_are_whitelisted() {
        for table in [
            SCHEMA_OBJECT_KEYS,
            SINGLE_SCHEMA_KEYS,
            SEQUENCE_SCHEMA_KEYS,
            ANNOTATION_KEYS,
            NUMERIC_KEYS,
            STRING_KEYS,
            ARRAY_KEYS,
            OBJECT_KEYS,
        ] {
            for key in table {
                assert!(SCHEMA_KEYS.contains(key), "{key} missing from SCHEMA_KEYS");
            }
        }
    }

    #[test]
    fn test_contains_excluded_from_array_family() {
        assert!(!ARRAY_KEYS.contains(&"contains"));
    }

    #[test]
    fn test_no_duplicate_schema_keys() {
        let mut seen = std::collections::HashSet::new();
        for key in SCHEMA_KEYS {
            assert!(seen.insert(key), "duplicate key: {key}");
        }
    }
}
