//! Type-to-schema projection.
//!
//! Lower the type set computed by analysis back into schema syntax. Degenerate
//! sets become sentinels or literal value schemas; everything else gets a
//! canonical `type` keyword (or none, when the full set carries no
//! information).

use serde_json::{Map, Value};

use crate::schema::Schema;
use crate::typeset::{TypeSet, TypeTag};

/// Project a surviving keyword mapping and its type set into a schema.
pub fn project(mut map: Map<String, Value>, mut set: TypeSet) -> Schema {
    if set.is_empty() {
        return Schema::Reject;
    }

    // A lowered `type` list never spells out both `number` and `integer`;
    // the full set is exempt because it drops the keyword entirely.
    if set != TypeSet::ALL && set.contains(TypeTag::Number) && set.contains(TypeTag::Integer) {
        set.remove(TypeTag::Integer);
    }

    // Null and boolean carry no type-specific keywords, so a bare set over
    // them enumerates its instances outright. Any other surviving keyword
    // (`const`, `enum`, `not`, combinators, vendor extensions) blocks the
    // enumeration and falls through to the generic lowering.
    if only_type_keyword(&map) {
        let nb = match (set.contains(TypeTag::Null), set.contains(TypeTag::Boolean)) {
            (true, false) if set.len() == 1 => Some(const_of(Value::Null)),
            (false, true) if set.len() == 1 => Some(enum_of(vec![false.into(), true.into()])),
            (true, true) if set.len() == 2 => {
                Some(enum_of(vec![Value::Null, false.into(), true.into()]))
            }
            _ => None,
        };
        if let Some(schema) = nb {
            return schema;
        }
    }

    if set == TypeSet::ALL {
        map.remove("type");
        return Schema::from_map(map);
    }

    let lowered = if set.len() == 1 {
        let tag = set.iter().next().unwrap();
        Value::String(tag.as_str().to_string())
    } else {
        set.to_sorted_value()
    };
    map.insert("type".to_string(), lowered);
    Schema::Constrained(map)
}

fn only_type_keyword(map: &Map<String, Value>) -> bool {
    map.keys().all(|k| k.as_str() == "type")
}

fn enum_of(values: Vec<Value>) -> Schema {
    let mut map = Map::new();
    map.insert("enum".to_string(), Value::Array(values));
    Schema::Constrained(map)
}

fn const_of(value: Value) -> Schema {
    let mut map = Map::new();
    map.insert("const".to_string(), value);
    Schema::Constrained(map)
}
