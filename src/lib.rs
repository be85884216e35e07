//! JSON Schema canonicalization.
//!
//! Reduces a draft-07-class JSON Schema to a canonical form in which
//! semantically equivalent inputs share one representation: annotations are
//! stripped, degenerate composition collapses, unsatisfiable constraints
//! become the single `false` sentinel, and pinned numeric intervals become
//! `const` schemas. The engine is a confluent rewrite system — each node is
//! re-passed until it reaches a structural fixed point, children before
//! parents.
//!
//! Unrecognized keywords pass through untouched, so vendor extensions
//! survive canonicalization.
//!
//! ## Usage
//!
//! ```rust
//! use jsonschema_canon::canonicalize;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "allOf": [{ "type": "integer", "uniqueItems": false }],
//!     "title": "Count"
//! });
//!
//! assert_eq!(canonicalize(&schema).unwrap(), json!({ "type": "integer" }));
//! ```

mod bounds;
mod canonicalizer;
mod config;
mod error;
mod keywords;
mod passes;
mod paths;
mod schema;
mod typeset;

pub use canonicalizer::{canonicalize, canonicalize_schema, canonicalize_with};
pub use config::CanonOptions;
pub use error::CanonError;
pub use keywords::{SCHEMA_KEYS, SCHEMA_OBJECT_KEYS};
pub use paths::{build_path, escape_pointer_segment};
pub use schema::Schema;
pub use typeset::{TypeSet, TypeTag};
