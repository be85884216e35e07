//! The seven JSON primitive type tags and sets over them.
//!
//! A `TypeSet` is transient: computed during one canonicalization pass and
//! either discarded or lowered back into a `type` keyword by the projector.
//! Absence of a `type` keyword denotes the full seven-tag set.

use serde_json::Value;

/// A JSON primitive type tag. Variant order is lexicographic by name, which
/// gives the canonical sort order for multi-tag `type` sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeTag {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

const ALL_TAGS: [TypeTag; 7] = [
    TypeTag::Array,
    TypeTag::Boolean,
    TypeTag::Integer,
    TypeTag::Null,
    TypeTag::Number,
    TypeTag::Object,
    TypeTag::String,
];

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Array => "array",
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Null => "null",
            TypeTag::Number => "number",
            TypeTag::Object => "object",
            TypeTag::String => "string",
        }
    }

    pub fn from_str(name: &str) -> Option<Self> {
        ALL_TAGS.iter().copied().find(|t| t.as_str() == name)
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A set (not sequence) over the seven primitive type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSet(u8);

impl TypeSet {
    pub const EMPTY: TypeSet = TypeSet(0);
    pub const ALL: TypeSet = TypeSet(0x7f);

    pub fn contains(self, tag: TypeTag) -> bool {
        self.0 & tag.bit() != 0
    }

    pub fn insert(&mut self, tag: TypeTag) {
        self.0 |= tag.bit();
    }

    pub fn remove(&mut self, tag: TypeTag) {
        self.0 &= !tag.bit();
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_subset(self, other: TypeSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterate tags in canonical (lexicographic) order.
    pub fn iter(self) -> impl Iterator<Item = TypeTag> {
        ALL_TAGS.into_iter().filter(move |t| self.contains(*t))
    }

    /// Parse a `type` keyword value: a single tag name or an array of tag
    /// names. Returns `None` for any other shape or unrecognized tag.
    pub fn try_from_value(value: &Value) -> Option<TypeSet> {
        match value {
            Value::String(name) => {
                let mut set = TypeSet::EMPTY;
                set.insert(TypeTag::from_str(name)?);
                Some(set)
            }
            Value::Array(names) => {
                let mut set = TypeSet::EMPTY;
                for name in names {
                    set.insert(TypeTag::from_str(name.as_str()?)?);
                }
                Some(set)
            }
            _ => None,
        }
    }

    /// Lower a multi-tag set into a sorted, deduplicated `type` sequence.
    pub fn to_sorted_value(self) -> Value {
        Value::Array(
            self.iter()
                .map(|t| Value::String(t.as_str().to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_single_tag() {
        let set = TypeSet::try_from_value(&json!("integer")).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(TypeTag::Integer));
    }

    #[test]
    fn test_parse_tag_list_dedupes() {
        let set = TypeSet::try_from_value(&json!(["string", "null", "string"])).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(TypeTag::String));
        assert!(set.contains(TypeTag::Null));
    }

    #[test]
    fn test_parse_rejects_unknown_tag() {
        assert_eq!(TypeSet::try_from_value(&json!("float")), None);
        assert_eq!(TypeSet::try_from_value(&json!(["string", 3])), None);
        assert_eq!(TypeSet::try_from_value(&json!(42)), None);
    }

    #[test]
    fn test_full_set_from_all_tags() {
        let set = TypeSet::try_from_value(&json!([
            "null", "boolean", "integer", "number", "string", "array", "object"
        ]))
        .unwrap();
        assert_eq!(set, TypeSet::ALL);
    }

    #[test]
    fn test_sorted_lowering() {
        let mut set = TypeSet::EMPTY;
        set.insert(TypeTag::String);
        set.insert(TypeTag::Array);
        set.insert(TypeTag::Null);
        assert_eq!(set.to_sorted_value(), json!(["array", "null", "string"]));
    }

    #[test]
    fn test_remove() {
        let mut set = TypeSet::ALL;
        set.remove(TypeTag::Number);
        assert_eq!(set.len(), 6);
        assert!(!set.contains(TypeTag::Number));
    }

    #[test]
    fn test_subset() {
        let strings = TypeSet::try_from_value(&json!("string")).unwrap();
        let pair = TypeSet::try_from_value(&json!(["string", "null"])).unwrap();
        assert!(strings.is_subset(pair));
        assert!(!pair.is_subset(strings));
        assert!(TypeSet::EMPTY.is_subset(strings));
        assert!(pair.is_subset(TypeSet::ALL));
    }
}
