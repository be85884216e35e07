//! Error types for schema canonicalization.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanonError {
    /// A recognized keyword carried a value of the wrong JSON shape
    /// (e.g. `properties` that is not an object). This is a caller
    /// precondition violation, never a property of valid schemas.
    #[error("Invalid shape for `{keyword}` at {path}: expected {expected}")]
    InvalidShape {
        path: String,
        keyword: String,
        expected: &'static str,
    },

    #[error("Recursion depth exceeded at {path} (max: {max_depth})")]
    RecursionDepthExceeded { path: String, max_depth: usize },
}
