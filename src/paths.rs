//! JSON Pointer construction for diagnostics.
//!
//! Error paths are RFC 6901 pointers rooted at `#`, extended keyword by
//! keyword as the canonicalizer descends into sub-schemas.

use std::borrow::Cow;

/// Escape one pointer segment: `~` becomes `~0` and `/` becomes `~1`.
///
/// Borrows the input when it contains neither character.
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if !segment.contains(['~', '/']) {
        return Cow::Borrowed(segment);
    }
    let mut escaped = String::with_capacity(segment.len() + 2);
    for c in segment.chars() {
        match c {
            '~' => escaped.push_str("~0"),
            '/' => escaped.push_str("~1"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Append escaped segments to a parent pointer.
///
/// # Example
/// ```
/// use jsonschema_canon::build_path;
/// assert_eq!(build_path("#", &["definitions", "a~b"]), "#/definitions/a~0b");
/// ```
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    segments
        .iter()
        .fold(parent.to_string(), |mut path, segment| {
            path.push('/');
            path.push_str(&escape_pointer_segment(segment));
            path
        })
}
