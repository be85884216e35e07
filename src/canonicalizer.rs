//! The recursion and fixed-point driver.
//!
//! Canonicalization is depth-first: every sub-schema position is fully
//! canonicalized before its parent runs, so parent-level rules (sentinel
//! absorption, composition collapse) see children already reduced to their
//! canonical forms. Each node then iterates the three-stage pass (structural
//! normalization → type analysis → projection) until a full pass leaves the
//! node unchanged.
//!
//! `if`/`then`/`else` and `definitions` are deliberately not recursed into:
//! conditional semantics are out of scope and their payloads pass through
//! untouched, as do unrecognized keywords.

use serde_json::{Map, Value};

use crate::config::CanonOptions;
use crate::error::CanonError;
use crate::keywords::{SCHEMA_OBJECT_KEYS, SEQUENCE_SCHEMA_KEYS, SINGLE_SCHEMA_KEYS};
use crate::passes::type_analysis::Analysis;
use crate::passes::{projection, structural, type_analysis};
use crate::paths::build_path;
use crate::schema::Schema;

/// Canonicalize a schema document with default options.
pub fn canonicalize(schema: &Value) -> Result<Value, CanonError> {
    canonicalize_with(schema, &CanonOptions::default())
}

/// Canonicalize a schema document.
pub fn canonicalize_with(schema: &Value, options: &CanonOptions) -> Result<Value, CanonError> {
    canonicalize_node(schema, "#", "schema", 0, options)
}

/// Canonicalize an already-parsed [`Schema`].
pub fn canonicalize_schema(schema: Schema, options: &CanonOptions) -> Result<Schema, CanonError> {
    match schema {
        Schema::Constrained(map) => {
            let out = canonicalize_node(&Value::Object(map), "#", "schema", 0, options)?;
            Ok(match out {
                Value::Bool(false) => Schema::Reject,
                Value::Object(map) => Schema::from_map(map),
                _ => Schema::Accept,
            })
        }
        sentinel => Ok(sentinel),
    }
}

fn canonicalize_node(
    value: &Value,
    path: &str,
    keyword: &str,
    depth: usize,
    options: &CanonOptions,
) -> Result<Value, CanonError> {
    if depth > options.max_depth {
        return Err(CanonError::RecursionDepthExceeded {
            path: path.to_string(),
            max_depth: options.max_depth,
        });
    }
    let schema = Schema::try_from_value(value).ok_or_else(|| CanonError::InvalidShape {
        path: path.to_string(),
        keyword: keyword.to_string(),
        expected: "a boolean or object schema",
    })?;
    let Schema::Constrained(mut map) = schema else {
        return Ok(schema.into_value());
    };

    canonicalize_children(&mut map, path, depth, options)?;

    let mut passes = 0usize;
    loop {
        passes += 1;
        let before = map.clone();
        match run_pass(map, path)? {
            Schema::Constrained(next) => {
                if next == before {
                    tracing::trace!(path, passes, "node converged");
                    return Ok(Value::Object(next));
                }
                map = next;
            }
            sentinel => {
                tracing::trace!(path, passes, "node converged to sentinel");
                return Ok(sentinel.into_value());
            }
        }
    }
}

/// One full structural → analysis → projection pass over a node.
fn run_pass(map: Map<String, Value>, path: &str) -> Result<Schema, CanonError> {
    let map = match structural::apply(map, path)? {
        Schema::Constrained(map) => map,
        sentinel => return Ok(sentinel),
    };
    match type_analysis::analyze(map, path)? {
        Analysis::Replaced(schema) => Ok(schema),
        Analysis::Remainder(map, set) => Ok(projection::project(map, set)),
    }
}

/// Recurse into every sub-schema position of a keyword mapping, replacing
/// each child with its canonical form. Children are extracted, canonicalized,
/// and reinserted under the same keyword.
fn canonicalize_children(
    map: &mut Map<String, Value>,
    path: &str,
    depth: usize,
    options: &CanonOptions,
) -> Result<(), CanonError> {
    for keyword in SCHEMA_OBJECT_KEYS {
        let Some(value) = map.remove(*keyword) else {
            continue;
        };
        let Value::Object(entries) = value else {
            return Err(CanonError::InvalidShape {
                path: path.to_string(),
                keyword: keyword.to_string(),
                expected: "an object mapping names to schemas",
            });
        };
        let mut canonical = Map::new();
        for (name, child) in entries {
            // A dependencies entry may be a plain list of property names.
            if *keyword == "dependencies" && child.is_array() {
                canonical.insert(name, child);
                continue;
            }
            let child_path = build_path(path, &[keyword, &name]);
            let out = canonicalize_node(&child, &child_path, keyword, depth + 1, options)?;
            canonical.insert(name, out);
        }
        map.insert(keyword.to_string(), Value::Object(canonical));
    }

    for keyword in SINGLE_SCHEMA_KEYS {
        let Some(child) = map.remove(*keyword) else {
            continue;
        };
        let child_path = build_path(path, &[keyword]);
        let out = canonicalize_node(&child, &child_path, keyword, depth + 1, options)?;
        map.insert(keyword.to_string(), out);
    }

    // `items` is a single schema or a tuple of schemas.
    if let Some(value) = map.remove("items") {
        let out = match value {
            Value::Array(members) => {
                let mut canonical = Vec::with_capacity(members.len());
                for (index, member) in members.into_iter().enumerate() {
                    let child_path = build_path(path, &["items", &index.to_string()]);
                    canonical.push(canonicalize_node(
                        &member,
                        &child_path,
                        "items",
                        depth + 1,
                        options,
                    )?);
                }
                Value::Array(canonical)
            }
            single => {
                canonicalize_node(&single, &build_path(path, &["items"]), "items", depth + 1, options)?
            }
        };
        map.insert("items".to_string(), out);
    }

    for keyword in SEQUENCE_SCHEMA_KEYS {
        let Some(value) = map.remove(*keyword) else {
            continue;
        };
        let Value::Array(members) = value else {
            return Err(CanonError::InvalidShape {
                path: path.to_string(),
                keyword: keyword.to_string(),
                expected: "an array of schemas",
            });
        };
        let mut canonical = Vec::with_capacity(members.len());
        for (index, member) in members.into_iter().enumerate() {
            let child_path = build_path(path, &[keyword, &index.to_string()]);
            canonical.push(canonicalize_node(
                &member,
                &child_path,
                keyword,
                depth + 1,
                options,
            )?);
        }
        map.insert(keyword.to_string(), Value::Array(canonical));
    }

    Ok(())
}
