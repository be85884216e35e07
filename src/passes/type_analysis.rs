//! Type possibility analysis.
//!
//! Given a structurally-normalized node, compute the minimal set of JSON
//! primitive types the schema can still describe, eliminating types whose
//! constraints are unsatisfiable (inverted bounds, impossible `multipleOf`,
//! impossible cardinalities), and strip keyword families tied to eliminated
//! types. Degenerate numeric intervals collapse the node to a `const`
//! schema outright.

use serde_json::{Map, Value};

use crate::bounds::Bound;
use crate::error::CanonError;
use crate::keywords::{ARRAY_KEYS, NUMERIC_KEYS, OBJECT_KEYS, STRING_KEYS};
use crate::passes::{get_uint, number_value, values_equal};
use crate::schema::{value_is_accept, value_is_reject, Schema};
use crate::typeset::{TypeSet, TypeTag};

/// Outcome of analyzing one node.
#[derive(Debug)]
pub enum Analysis {
    /// The node was replaced wholesale (degenerate interval → `const`).
    Replaced(Schema),
    /// The surviving keyword mapping and type set, ready for projection.
    Remainder(Map<String, Value>, TypeSet),
}

/// Analyze a structurally-normalized keyword mapping.
pub fn analyze(mut map: Map<String, Value>, path: &str) -> Result<Analysis, CanonError> {
    let explicit = map.contains_key("type");
    let mut set = match map.get("type") {
        Some(value) => {
            TypeSet::try_from_value(value).ok_or_else(|| CanonError::InvalidShape {
                path: path.to_string(),
                keyword: "type".to_string(),
                expected: "a primitive type name or array of type names",
            })?
        }
        None => TypeSet::ALL,
    };

    // `integer` is subsumed by `number` in an explicit declaration. The
    // full set is exempt (whether implicit or spelled out): it lowers to
    // no `type` keyword at all, and removing a tag here would turn an
    // unconstrained node into a six-tag list.
    if explicit
        && set != TypeSet::ALL
        && set.contains(TypeTag::Number)
        && set.contains(TypeTag::Integer)
    {
        set.remove(TypeTag::Integer);
    }

    if let Some(replacement) = analyze_numeric(&mut map, &mut set, explicit) {
        return Ok(Analysis::Replaced(replacement));
    }
    analyze_string(&map, &mut set, path)?;
    analyze_array(&mut map, &mut set, path)?;
    analyze_object(&mut map, &mut set, path)?;
    prune_dead_families(&mut map, set);

    Ok(Analysis::Remainder(map, set))
}

// ---------------------------------------------------------------------------
// Numeric analysis
// ---------------------------------------------------------------------------

fn analyze_numeric(
    map: &mut Map<String, Value>,
    set: &mut TypeSet,
    explicit: bool,
) -> Option<Schema> {
    if !set.contains(TypeTag::Number) && !set.contains(TypeTag::Integer) {
        return None;
    }

    // Legacy draft-04 boolean flags: `false` is the default and a no-op.
    for keyword in ["exclusiveMinimum", "exclusiveMaximum"] {
        if map.get(keyword) == Some(&Value::Bool(false)) {
            map.remove(keyword);
        }
    }

    let multiple = map.get("multipleOf").and_then(Value::as_f64);

    // An integral multipleOf admits only integral values: membership moves
    // from `number` to `integer`. Only a declared `number` moves; the
    // default full set already covers both tags.
    if explicit && set.contains(TypeTag::Number) {
        if let Some(m) = multiple {
            if m > 0.0 && m.fract() == 0.0 {
                set.remove(TypeTag::Number);
                set.insert(TypeTag::Integer);
            }
        }
    }

    let bound = Bound::from_map(map);

    if set.contains(TypeTag::Number) {
        let unsatisfiable = bound.is_inverted()
            || multiple.is_some_and(|m| m > 0.0 && !bound.contains_multiple_of(m));
        if unsatisfiable {
            set.remove(TypeTag::Number);
        } else if *set == singleton(TypeTag::Number) && multiple.map_or(true, |m| m > 0.0) {
            if let Some(value) = bound.single_value() {
                return Some(const_schema(number_value(value)));
            }
        }
    }

    if set.contains(TypeTag::Integer) {
        let int_bound = bound.to_integral();
        if int_bound.is_inverted() {
            set.remove(TypeTag::Integer);
        } else if let Some(m) = multiple {
            if m > 0.0 {
                if m.fract() == 0.0 {
                    if !int_bound.contains_multiple_of(m) {
                        set.remove(TypeTag::Integer);
                    }
                } else if (1.0 / m).fract() == 0.0 && !set.contains(TypeTag::Number) {
                    // Every integer is a multiple of 1/n.
                    map.remove("multipleOf");
                }
            }
        }
        // A fractional multipleOf that survived blocks the collapse: the
        // pinned value may not be one of its multiples.
        let multiple_settled = !map.contains_key("multipleOf")
            || multiple.is_some_and(|m| m > 0.0 && m.fract() == 0.0);
        if set.contains(TypeTag::Integer) && *set == singleton(TypeTag::Integer) && multiple_settled
        {
            if let Some(value) = int_bound.single_value() {
                return Some(const_schema(number_value(value)));
            }
        }
    }

    None
}

fn singleton(tag: TypeTag) -> TypeSet {
    let mut set = TypeSet::EMPTY;
    set.insert(tag);
    set
}

fn const_schema(value: Value) -> Schema {
    let mut map = Map::new();
    map.insert("const".to_string(), value);
    Schema::Constrained(map)
}

// ---------------------------------------------------------------------------
// String analysis
// ---------------------------------------------------------------------------

fn analyze_string(
    map: &Map<String, Value>,
    set: &mut TypeSet,
    path: &str,
) -> Result<(), CanonError> {
    if !set.contains(TypeTag::String) {
        return Ok(());
    }
    let min = get_uint(map, "minLength", path)?.unwrap_or(0);
    if let Some(max) = get_uint(map, "maxLength", path)? {
        if min > max {
            set.remove(TypeTag::String);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Array analysis
// ---------------------------------------------------------------------------

fn analyze_array(
    map: &mut Map<String, Value>,
    set: &mut TypeSet,
    path: &str,
) -> Result<(), CanonError> {
    if !set.contains(TypeTag::Array) {
        return Ok(());
    }

    if let Some(contains) = map.get("contains") {
        if value_is_reject(contains) {
            // Nothing satisfies the containment requirement. The keyword is
            // deliberately retained as an explicit unsatisfiability marker.
            set.remove(TypeTag::Array);
            return Ok(());
        }
        if value_is_accept(contains) {
            map.remove("contains");
            let min = get_uint(map, "minItems", path)?.unwrap_or(0).max(1);
            map.insert("minItems".to_string(), min.into());
        }
    }

    if map.get("items").is_some_and(value_is_reject) {
        map.insert("maxItems".to_string(), 0.into());
        for keyword in ["items", "uniqueItems", "additionalItems"] {
            map.remove(keyword);
        }
    }

    if get_uint(map, "maxItems", path)? == Some(0) {
        for keyword in ["items", "uniqueItems", "additionalItems"] {
            map.remove(keyword);
        }
    }

    // With unique elements, a finite item domain bounds the array length.
    if map.get("uniqueItems") == Some(&Value::Bool(true)) {
        let count = map
            .get("items")
            .filter(|items| items.is_object())
            .and_then(distinct_instance_count);
        if let Some(count) = count {
            let min = get_uint(map, "minItems", path)?.unwrap_or(0);
            if count < min {
                set.remove(TypeTag::Array);
                return Ok(());
            }
            let bound = get_uint(map, "maxItems", path)?.map_or(count, |max| max.min(count));
            map.insert("maxItems".to_string(), bound.into());
        }
    }

    let min = get_uint(map, "minItems", path)?.unwrap_or(0);
    if let Some(max) = get_uint(map, "maxItems", path)? {
        if min > max {
            set.remove(TypeTag::Array);
            return Ok(());
        }
    }

    // Tuple form with Reject additionalItems: the tuple arity already
    // bounds the length, so maxItems is redundant (after truncating the
    // tuple to any tighter existing bound).
    let tuple_len = map.get("items").and_then(Value::as_array).map(Vec::len);
    if let Some(len) = tuple_len {
        if map.get("additionalItems").is_some_and(value_is_reject) {
            if let Some(max) = get_uint(map, "maxItems", path)? {
                if (max as usize) < len {
                    if let Some(Value::Array(items)) = map.get_mut("items") {
                        items.truncate(max as usize);
                    }
                }
                map.remove("maxItems");
            }
        }
    }

    Ok(())
}

/// Upper bound on the number of distinct instances a sub-schema admits,
/// when that bound is finite and cheap to see. `None` means unbounded or
/// unknown.
fn distinct_instance_count(schema: &Value) -> Option<u64> {
    if value_is_reject(schema) {
        return Some(0);
    }
    let obj = schema.as_object()?;
    if obj.contains_key("const") {
        return Some(1);
    }
    if let Some(values) = obj.get("enum").and_then(Value::as_array) {
        let mut seen: Vec<&Value> = Vec::new();
        for v in values {
            if !seen.iter().any(|s| values_equal(s, v)) {
                seen.push(v);
            }
        }
        return Some(seen.len() as u64);
    }
    let declared = TypeSet::try_from_value(obj.get("type")?)?;
    let mut count = 0u64;
    for tag in declared.iter() {
        count += match tag {
            TypeTag::Null => 1,
            TypeTag::Boolean => 2,
            _ => return None,
        };
    }
    Some(count)
}

// ---------------------------------------------------------------------------
// Object analysis
// ---------------------------------------------------------------------------

fn analyze_object(
    map: &mut Map<String, Value>,
    set: &mut TypeSet,
    path: &str,
) -> Result<(), CanonError> {
    if !set.contains(TypeTag::Object) {
        return Ok(());
    }

    let mut required_len = 0u64;
    if let Some(value) = map.get("required") {
        let names = value.as_array().ok_or_else(|| CanonError::InvalidShape {
            path: path.to_string(),
            keyword: "required".to_string(),
            expected: "an array of property names",
        })?;
        let mut sorted: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_str().ok_or_else(|| CanonError::InvalidShape {
                path: path.to_string(),
                keyword: "required".to_string(),
                expected: "an array of property names",
            })?;
            sorted.push(name.to_string());
        }
        sorted.sort();
        sorted.dedup();
        required_len = sorted.len() as u64;
        map.insert(
            "required".to_string(),
            Value::Array(sorted.into_iter().map(Value::String).collect()),
        );
    }

    let min = get_uint(map, "minProperties", path)?.unwrap_or(0);
    if let Some(max) = get_uint(map, "maxProperties", path)? {
        if min > max || required_len > max {
            set.remove(TypeTag::Object);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Keyword-family pruning
// ---------------------------------------------------------------------------

/// Drop every keyword meaningful only to an eliminated type family.
/// `contains` is excluded from the array family (see `analyze_array`).
fn prune_dead_families(map: &mut Map<String, Value>, set: TypeSet) {
    if !set.contains(TypeTag::Number) && !set.contains(TypeTag::Integer) {
        for keyword in NUMERIC_KEYS {
            map.remove(*keyword);
        }
    }
    if !set.contains(TypeTag::String) {
        for keyword in STRING_KEYS {
            map.remove(*keyword);
        }
    }
    if !set.contains(TypeTag::Array) {
        for keyword in ARRAY_KEYS {
            map.remove(*keyword);
        }
    }
    if !set.contains(TypeTag::Object) {
        for keyword in OBJECT_KEYS {
            map.remove(*keyword);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
