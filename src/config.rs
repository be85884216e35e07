//! Configuration for schema canonicalization.

use serde::{Deserialize, Serialize};

/// Options for canonicalization.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `max-depth`). This naming
/// convention is part of the public API contract for embedders that load
/// options from configuration files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CanonOptions {
    /// Maximum schema nesting depth (stack overflow guard). Recursion depth
    /// equals nesting depth of the input; exceeding this limit is reported
    /// as an error rather than exhausting the stack.
    pub max_depth: usize,
}

impl Default for CanonOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}
