//! Structural normalization rules.
//!
//! Type-agnostic simplifications applied once per pass: annotation and
//! default-value pruning, composite-schema (`allOf`/`anyOf`/`oneOf`/`not`)
//! simplification, and removal of the no-op keyword forms. The rules assume
//! children are already canonicalized, so sentinel-equivalence checks on
//! sub-schemas are exact matches against the boolean sentinel encodings.

use serde_json::{Map, Value};

use crate::error::CanonError;
use crate::keywords::ANNOTATION_KEYS;
use crate::passes::{get_uint, number_value, values_equal};
use crate::schema::{value_is_accept, value_is_reject, Schema};
use crate::typeset::{TypeSet, TypeTag};

/// Apply every structural rule to a child-canonical keyword mapping.
///
/// May collapse the node to a sentinel (`allOf` with a Reject member,
/// `oneOf` with no satisfiable branch, empty `enum`, `not: true`) or
/// replace it wholesale (singleton `allOf`).
pub fn apply(mut map: Map<String, Value>, path: &str) -> Result<Schema, CanonError> {
    strip_annotations(&mut map);
    normalize_multiple_of(&mut map, path)?;
    drop_unique_items_false(&mut map, path)?;
    drop_noop_forms(&mut map, path)?;
    simplify_array_items(&mut map);
    filter_dependencies(&mut map, path)?;
    collapse_rejected_properties(&mut map, path)?;
    clear_empty_object_constraints(&mut map, path)?;
    if dedupe_enum(&mut map, path)? {
        return Ok(Schema::Reject);
    }
    if let Some(replacement) = simplify_not(&mut map, path)? {
        return Ok(replacement);
    }
    if let Some(replacement) = simplify_all_of(&mut map, path)? {
        return Ok(replacement);
    }
    if simplify_any_of(&mut map, path)? {
        return Ok(Schema::Reject);
    }
    if simplify_one_of(&mut map, path)? {
        return Ok(Schema::Reject);
    }
    Ok(Schema::from_map(map))
}

// ---------------------------------------------------------------------------
// Keyword pruning
// ---------------------------------------------------------------------------

/// Annotations never affect validation.
fn strip_annotations(map: &mut Map<String, Value>) {
    for keyword in ANNOTATION_KEYS {
        map.remove(*keyword);
    }
}

/// `multipleOf: m` → `multipleOf: abs(m)`.
fn normalize_multiple_of(map: &mut Map<String, Value>, path: &str) -> Result<(), CanonError> {
    let Some(value) = map.get("multipleOf") else {
        return Ok(());
    };
    let Some(m) = value.as_f64() else {
        return Err(CanonError::InvalidShape {
            path: path.to_string(),
            keyword: "multipleOf".to_string(),
            expected: "a number",
        });
    };
    if m < 0.0 {
        map.insert("multipleOf".to_string(), number_value(-m));
    }
    Ok(())
}

fn drop_unique_items_false(map: &mut Map<String, Value>, path: &str) -> Result<(), CanonError> {
    match map.get("uniqueItems") {
        Some(Value::Bool(false)) => {
            map.remove("uniqueItems");
            Ok(())
        }
        Some(Value::Bool(true)) | None => Ok(()),
        Some(_) => Err(CanonError::InvalidShape {
            path: path.to_string(),
            keyword: "uniqueItems".to_string(),
            expected: "a boolean",
        }),
    }
}

/// Remove the no-op keyword forms: default-valued counts, empty collections,
/// and Accept-equivalent sub-schemas that constrain nothing.
fn drop_noop_forms(map: &mut Map<String, Value>, path: &str) -> Result<(), CanonError> {
    for keyword in ["minItems", "minProperties"] {
        if get_uint(map, keyword, path)? == Some(0) {
            map.remove(keyword);
        }
    }

    if let Some(value) = map.get("required") {
        let Some(names) = value.as_array() else {
            return Err(CanonError::InvalidShape {
                path: path.to_string(),
                keyword: "required".to_string(),
                expected: "an array of property names",
            });
        };
        if names.is_empty() {
            map.remove("required");
        }
    }

    for keyword in ["properties", "patternProperties"] {
        if let Some(value) = map.get(keyword) {
            let Some(entries) = value.as_object() else {
                return Err(CanonError::InvalidShape {
                    path: path.to_string(),
                    keyword: keyword.to_string(),
                    expected: "an object of schemas",
                });
            };
            if entries.is_empty() {
                map.remove(keyword);
            }
        }
    }

    for keyword in [
        "items",
        "additionalItems",
        "additionalProperties",
        "propertyNames",
    ] {
        if map.get(keyword).is_some_and(value_is_accept) {
            map.remove(keyword);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Array shape simplification
// ---------------------------------------------------------------------------

/// `additionalItems` only participates in validation when `items` is the
/// tuple form; otherwise it is dead. An empty tuple delegates every position
/// to `additionalItems`, which therefore becomes the single-form `items`.
fn simplify_array_items(map: &mut Map<String, Value>) {
    let tuple_form = map.get("items").is_some_and(Value::is_array);
    if !tuple_form {
        map.remove("additionalItems");
    }
    if map
        .get("items")
        .and_then(Value::as_array)
        .is_some_and(|items| items.is_empty())
    {
        match map.remove("additionalItems") {
            Some(extra) => {
                map.insert("items".to_string(), extra);
            }
            None => {
                map.remove("items");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Object keyword rules
// ---------------------------------------------------------------------------

/// Keep only `dependencies` entries that still constrain something: an
/// empty requirement list and an Accept-equivalent schema are both no-ops.
fn filter_dependencies(map: &mut Map<String, Value>, path: &str) -> Result<(), CanonError> {
    let Some(value) = map.get_mut("dependencies") else {
        return Ok(());
    };
    let Some(entries) = value.as_object_mut() else {
        return Err(CanonError::InvalidShape {
            path: path.to_string(),
            keyword: "dependencies".to_string(),
            expected: "an object",
        });
    };
    entries.retain(|_, entry| {
        let empty_list = entry.as_array().is_some_and(|names| names.is_empty());
        !empty_list && !value_is_accept(entry)
    });
    if entries.is_empty() {
        map.remove("dependencies");
    }
    Ok(())
}

/// With `additionalProperties` Reject and no `patternProperties`, a property
/// outside `properties` can never appear, so Reject-valued entries are dead
/// and the surviving entry count bounds the instance size.
fn collapse_rejected_properties(
    map: &mut Map<String, Value>,
    path: &str,
) -> Result<(), CanonError> {
    if map.contains_key("patternProperties") {
        return Ok(());
    }
    if !map
        .get("additionalProperties")
        .is_some_and(value_is_reject)
    {
        return Ok(());
    }
    let Some(props) = map.get_mut("properties").and_then(Value::as_object_mut) else {
        return Ok(());
    };
    props.retain(|_, entry| !value_is_reject(entry));
    let count = props.len() as u64;
    let bound = get_uint(map, "maxProperties", path)?.map_or(count, |max| max.min(count));
    map.insert("maxProperties".to_string(), bound.into());
    Ok(())
}

/// `propertyNames: false` admits no property name at all, and
/// `maxProperties: 0` makes every property-shape keyword irrelevant.
fn clear_empty_object_constraints(
    map: &mut Map<String, Value>,
    path: &str,
) -> Result<(), CanonError> {
    if map.get("propertyNames").is_some_and(value_is_reject) {
        map.remove("propertyNames");
        map.insert("maxProperties".to_string(), 0.into());
    }
    if get_uint(map, "maxProperties", path)? == Some(0) {
        for keyword in ["properties", "patternProperties", "additionalProperties"] {
            map.remove(keyword);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// enum / composite rules
// ---------------------------------------------------------------------------

/// Deduplicate `enum` preserving first-occurrence order. An empty `enum`
/// admits nothing; the node collapses to Reject (returns `true`).
fn dedupe_enum(map: &mut Map<String, Value>, path: &str) -> Result<bool, CanonError> {
    let Some(value) = map.get_mut("enum") else {
        return Ok(false);
    };
    let Some(values) = value.as_array_mut() else {
        return Err(CanonError::InvalidShape {
            path: path.to_string(),
            keyword: "enum".to_string(),
            expected: "an array of values",
        });
    };
    let mut seen: Vec<Value> = Vec::with_capacity(values.len());
    values.retain(|v| {
        if seen.iter().any(|s| values_equal(s, v)) {
            false
        } else {
            seen.push(v.clone());
            true
        }
    });
    Ok(values.is_empty())
}

/// `not` simplification. `not: Accept` rejects everything; `not: Reject`
/// rejects nothing and is dropped. A bare double negation unwraps to the
/// inner schema, and a negated bare `type` that covers every declared type
/// admits nothing.
fn simplify_not(
    map: &mut Map<String, Value>,
    path: &str,
) -> Result<Option<Schema>, CanonError> {
    let Some(value) = map.get("not") else {
        return Ok(None);
    };
    if value_is_accept(value) {
        return Ok(Some(Schema::Reject));
    }
    if value_is_reject(value) {
        map.remove("not");
        return Ok(None);
    }
    let Some(inner) = value.as_object() else {
        return Err(CanonError::InvalidShape {
            path: path.to_string(),
            keyword: "not".to_string(),
            expected: "a schema (boolean or object)",
        });
    };
    if inner.len() != 1 {
        return Ok(None);
    }
    if map.len() == 1 {
        if let Some(unwrapped) = inner.get("not") {
            let replacement =
                Schema::try_from_value(unwrapped).ok_or_else(|| CanonError::InvalidShape {
                    path: path.to_string(),
                    keyword: "not".to_string(),
                    expected: "a schema (boolean or object)",
                })?;
            return Ok(Some(replacement));
        }
    }
    if let Some(mut excluded) = inner.get("type").and_then(TypeSet::try_from_value) {
        // Every integer is a number, so excluding numbers excludes integers.
        if excluded.contains(TypeTag::Number) {
            excluded.insert(TypeTag::Integer);
        }
        let declared = map
            .get("type")
            .and_then(TypeSet::try_from_value)
            .unwrap_or(TypeSet::ALL);
        if declared.is_subset(excluded) {
            return Ok(Some(Schema::Reject));
        }
    }
    Ok(None)
}

/// `allOf` simplification. A Reject member poisons the node; Accept members
/// contribute nothing; a singleton survivor replaces the node verbatim.
fn simplify_all_of(
    map: &mut Map<String, Value>,
    path: &str,
) -> Result<Option<Schema>, CanonError> {
    let Some(value) = map.remove("allOf") else {
        return Ok(None);
    };
    let Value::Array(members) = value else {
        return Err(CanonError::InvalidShape {
            path: path.to_string(),
            keyword: "allOf".to_string(),
            expected: "an array of schemas",
        });
    };
    if members.iter().any(value_is_reject) {
        return Ok(Some(Schema::Reject));
    }
    let retained: Vec<Value> = members
        .into_iter()
        .filter(|member| !value_is_accept(member))
        .collect();
    match retained.len() {
        0 => Ok(None),
        1 => {
            let member = retained.into_iter().next().unwrap();
            let replacement =
                Schema::try_from_value(&member).ok_or_else(|| CanonError::InvalidShape {
                    path: path.to_string(),
                    keyword: "allOf".to_string(),
                    expected: "a schema (boolean or object)",
                })?;
            Ok(Some(replacement))
        }
        _ => {
            map.insert("allOf".to_string(), Value::Array(retained));
            Ok(None)
        }
    }
}

/// `anyOf` simplification (returns `true` when the node collapses to
/// Reject): an Accept member makes the keyword vacuous, Reject members can
/// never match and are elided, and a disjunction with no satisfiable branch
/// left admits nothing.
fn simplify_any_of(map: &mut Map<String, Value>, path: &str) -> Result<bool, CanonError> {
    let Some(value) = map.remove("anyOf") else {
        return Ok(false);
    };
    let Value::Array(members) = value else {
        return Err(CanonError::InvalidShape {
            path: path.to_string(),
            keyword: "anyOf".to_string(),
            expected: "an array of schemas",
        });
    };
    if members.iter().any(value_is_accept) {
        return Ok(false);
    }
    let retained: Vec<Value> = members
        .into_iter()
        .filter(|member| !value_is_reject(member))
        .collect();
    if retained.is_empty() {
        return Ok(true);
    }
    map.insert("anyOf".to_string(), Value::Array(retained));
    Ok(false)
}

/// `oneOf` simplification (returns `true` when the node collapses to
/// Reject): more than one Accept branch means every instance matches at
/// least two; no satisfiable branch means nothing matches exactly one.
/// Branches that are all singleton `const` schemas with distinct values
/// lower to an `enum`.
fn simplify_one_of(map: &mut Map<String, Value>, path: &str) -> Result<bool, CanonError> {
    let Some(value) = map.remove("oneOf") else {
        return Ok(false);
    };
    let Value::Array(members) = value else {
        return Err(CanonError::InvalidShape {
            path: path.to_string(),
            keyword: "oneOf".to_string(),
            expected: "an array of schemas",
        });
    };
    let accept_count = members.iter().filter(|m| value_is_accept(m)).count();
    if accept_count > 1 {
        return Ok(true);
    }
    let retained: Vec<Value> = members
        .into_iter()
        .filter(|member| !value_is_reject(member))
        .collect();
    if retained.is_empty() {
        return Ok(true);
    }

    if !map.contains_key("enum") {
        let consts: Option<Vec<&Value>> = retained
            .iter()
            .map(|member| {
                member
                    .as_object()
                    .filter(|obj| obj.len() == 1)
                    .and_then(|obj| obj.get("const"))
            })
            .collect();
        if let Some(values) = consts {
            let distinct = values
                .iter()
                .enumerate()
                .all(|(i, v)| !values[..i].iter().any(|p| values_equal(p, v)));
            if distinct {
                let values: Vec<Value> = values.into_iter().cloned().collect();
                map.insert("enum".to_string(), Value::Array(values));
                return Ok(false);
            }
        }
    }

    map.insert("oneOf".to_string(), Value::Array(retained));
    Ok(false)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(schema: Value) -> Schema {
        let Value::Object(map) = schema else {
            panic!("test fixture must be an object");
        };
        apply(map, "#").unwrap()
    }

    fn run_map(schema: Value) -> Value {
        match run(schema) {
            Schema::Constrained(map) => Value::Object(map),
            other => panic!("expected a constrained schema, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_of_abs() {
        assert_eq!(run_map(json!({"multipleOf": -5})), json!({"multipleOf": 5}));
        assert_eq!(
            run_map(json!({"multipleOf": -2.5})),
            json!({"multipleOf": 2.5})
        );
    }

    #[test]
    fn test_unique_items_false_dropped() {
        assert_eq!(run(json!({"uniqueItems": false})), Schema::Accept);
    }

    #[test]
    fn test_noop_forms_dropped() {
        let input = json!({
            "minItems": 0,
            "minProperties": 0,
            "required": [],
            "properties": {},
            "patternProperties": {},
            "dependencies": {},
            "items": true,
            "additionalProperties": true,
            "propertyNames": true
        });
        assert_eq!(run(input), Schema::Accept);
    }

    #[test]
    fn test_annotations_stripped() {
        let input = json!({
            "title": "A thing",
            "description": "words",
            "default": 3,
            "examples": [1, 2],
            "$comment": "internal",
            "type": "integer"
        });
        assert_eq!(run_map(input), json!({"type": "integer"}));
    }

    #[test]
    fn test_rejected_properties_collapse() {
        let out = run_map(json!({
            "properties": {"a": false, "b": {"type": "string"}},
            "additionalProperties": false
        }));
        assert_eq!(
            out,
            json!({
                "properties": {"b": {"type": "string"}},
                "additionalProperties": false,
                "maxProperties": 1
            })
        );
    }

    #[test]
    fn test_rejected_properties_keep_existing_tighter_bound() {
        let out = run_map(json!({
            "properties": {"a": {"type": "string"}, "b": {"type": "string"}},
            "additionalProperties": false,
            "maxProperties": 1
        }));
        assert_eq!(out["maxProperties"], json!(1));
    }

    #[test]
    fn test_pattern_properties_blocks_collapse() {
        let out = run_map(json!({
            "properties": {"a": false},
            "patternProperties": {"^x": {"type": "string"}},
            "additionalProperties": false
        }));
        assert_eq!(out["properties"], json!({"a": false}));
        assert!(out.get("maxProperties").is_none());
    }

    #[test]
    fn test_max_properties_zero_clears_property_keywords() {
        let out = run_map(json!({
            "maxProperties": 0,
            "properties": {"a": {"type": "string"}},
            "patternProperties": {"^x": true},
            "additionalProperties": {"type": "integer"}
        }));
        assert_eq!(out, json!({"maxProperties": 0}));
    }

    #[test]
    fn test_property_names_reject_forces_empty_object() {
        let out = run_map(json!({
            "propertyNames": false,
            "properties": {"a": {"type": "string"}}
        }));
        assert_eq!(out, json!({"maxProperties": 0}));
    }

    #[test]
    fn test_dependencies_filter() {
        let out = run_map(json!({
            "dependencies": {
                "a": [],
                "b": true,
                "c": ["d"],
                "e": {"type": "object"}
            }
        }));
        assert_eq!(
            out,
            json!({"dependencies": {"c": ["d"], "e": {"type": "object"}}})
        );
    }

    #[test]
    fn test_all_of_reject_member_poisons() {
        assert_eq!(
            run(json!({"allOf": [{"type": "string"}, false]})),
            Schema::Reject
        );
    }

    #[test]
    fn test_all_of_accept_members_dropped() {
        assert_eq!(run(json!({"allOf": [true, true]})), Schema::Accept);
    }

    #[test]
    fn test_all_of_singleton_replaces_node() {
        assert_eq!(
            run(json!({"allOf": [{"type": "integer"}], "uniqueItems": false})),
            Schema::Constrained(
                json!({"type": "integer"})
                    .as_object()
                    .unwrap()
                    .clone()
            )
        );
    }

    #[test]
    fn test_all_of_survivors_kept() {
        let out = run_map(json!({"allOf": [{"type": "integer"}, {"minimum": 3}, true]}));
        assert_eq!(out["allOf"], json!([{"type": "integer"}, {"minimum": 3}]));
    }

    #[test]
    fn test_any_of_accept_member_drops_keyword() {
        assert_eq!(run(json!({"anyOf": [{"type": "string"}, true]})), Schema::Accept);
    }

    #[test]
    fn test_any_of_reject_members_dropped() {
        let out = run_map(json!({"anyOf": [false, {"type": "string"}, {"type": "null"}]}));
        assert_eq!(out["anyOf"], json!([{"type": "string"}, {"type": "null"}]));
    }

    #[test]
    fn test_any_of_all_reject_poisons() {
        assert_eq!(run(json!({"anyOf": [false, false]})), Schema::Reject);
        assert_eq!(run(json!({"anyOf": [false], "minLength": 1})), Schema::Reject);
    }

    #[test]
    fn test_double_negation_unwraps() {
        assert_eq!(
            run(json!({"not": {"not": {"type": "string"}}})),
            Schema::Constrained(json!({"type": "string"}).as_object().unwrap().clone())
        );
        // Sibling keywords block the unwrap.
        let out = run_map(json!({"not": {"not": {"type": "string"}}, "minLength": 1}));
        assert_eq!(out["not"], json!({"not": {"type": "string"}}));
    }

    #[test]
    fn test_excluded_type_contradiction_rejects() {
        assert_eq!(
            run(json!({"type": "string", "not": {"type": "string"}})),
            Schema::Reject
        );
        assert_eq!(
            run(json!({"type": "integer", "not": {"type": "number"}})),
            Schema::Reject
        );
        // Partial exclusion keeps the node alive.
        let out = run_map(json!({"type": ["string", "null"], "not": {"type": "string"}}));
        assert_eq!(out["not"], json!({"type": "string"}));
        // Extra constraints on the negated schema block the rule.
        let out = run_map(json!({
            "type": "string",
            "not": {"type": "string", "minLength": 1}
        }));
        assert_eq!(out["not"], json!({"type": "string", "minLength": 1}));
    }

    #[test]
    fn test_one_of_all_reject() {
        assert_eq!(run(json!({"oneOf": [false, false]})), Schema::Reject);
    }

    #[test]
    fn test_one_of_two_accepts_ambiguous() {
        assert_eq!(run(json!({"oneOf": [true, true, {"type": "null"}]})), Schema::Reject);
    }

    #[test]
    fn test_one_of_reject_members_dropped() {
        let out = run_map(json!({"oneOf": [false, {"type": "string"}, {"type": "null"}]}));
        assert_eq!(out["oneOf"], json!([{"type": "string"}, {"type": "null"}]));
    }

    #[test]
    fn test_one_of_consts_lower_to_enum() {
        let out = run_map(json!({"oneOf": [{"const": 1}, {"const": "a"}, {"const": null}]}));
        assert_eq!(out, json!({"enum": [1, "a", null]}));
    }

    #[test]
    fn test_one_of_duplicate_consts_not_lowered() {
        let out = run_map(json!({"oneOf": [{"const": 1}, {"const": 1}]}));
        assert_eq!(out["oneOf"], json!([{"const": 1}, {"const": 1}]));
    }

    #[test]
    fn test_not_sentinels() {
        assert_eq!(run(json!({"not": true})), Schema::Reject);
        assert_eq!(run(json!({"not": false, "type": "string"})), run(json!({"type": "string"})));
    }

    #[test]
    fn test_enum_dedupe_and_empty() {
        assert_eq!(
            run_map(json!({"enum": [1, 2, 1, {"a": 1}, {"a": 1}]})),
            json!({"enum": [1, 2, {"a": 1}]})
        );
        assert_eq!(run(json!({"enum": []})), Schema::Reject);
    }

    #[test]
    fn test_enum_dedupe_by_numeric_value() {
        // `1` and `1.0` are the same instance; first spelling wins.
        assert_eq!(run_map(json!({"enum": [1, 1.0, 2.0]})), json!({"enum": [1, 2.0]}));
    }

    #[test]
    fn test_one_of_numerically_equal_consts_not_lowered() {
        let out = run_map(json!({"oneOf": [{"const": 1}, {"const": 1.0}]}));
        assert_eq!(out["oneOf"], json!([{"const": 1}, {"const": 1.0}]));
    }

    #[test]
    fn test_additional_items_dead_without_tuple() {
        assert_eq!(run(json!({"additionalItems": {"type": "string"}})), Schema::Accept);
        let out = run_map(json!({"items": {"type": "string"}, "additionalItems": false}));
        assert_eq!(out, json!({"items": {"type": "string"}}));
    }

    #[test]
    fn test_empty_tuple_promotes_additional_items() {
        let out = run_map(json!({"items": [], "additionalItems": {"type": "integer"}}));
        assert_eq!(out, json!({"items": {"type": "integer"}}));
        assert_eq!(run(json!({"items": []})), Schema::Accept);
    }

    #[test]
    fn test_invalid_shapes_fail_fast() {
        for bad in [
            json!({"multipleOf": "5"}),
            json!({"uniqueItems": 1}),
            json!({"required": {}}),
            json!({"properties": []}),
            json!({"dependencies": 3}),
            json!({"enum": {}}),
            json!({"allOf": {}}),
            json!({"anyOf": "x"}),
            json!({"oneOf": 7}),
        ] {
            let Value::Object(map) = bad else { unreachable!() };
            assert!(apply(map, "#").is_err());
        }
    }
}
