//! Sensitive attribute detection.

use serde_json::Value;

/// Placeholder substituted for any value flagged sensitive.
pub const REDACTED: &str = "[SENSITIVE]";

/// Sensitivity metadata for one resource.
#[derive(Debug, Clone, Copy)]
pub struct Sensitivity<'a> {
    before: &'a Value,
    after: &'a Value,
}

impl<'a> Sensitivity<'a> {
    /// Wraps the before/after sensitivity markers of a resource.
    #[must_use]
    pub const fn new(before: &'a Value, after: &'a Value) -> Self {
        Self { before, after }
    }

    /// Returns true if `field` is sensitive in either snapshot.
    ///
    /// The after markers are consulted first; the first map that contains
    /// the field decides.
    #[must_use]
    pub fn is_sensitive(&self, field: &str) -> bool {
        [self.after, self.before]
            .into_iter()
            .filter_map(Value::as_object)
            .find_map(|markers| markers.get(field))
            .is_some_and(any_sensitive)
    }
}

/// Returns true if the marker is `true` or contains a `true` leaf.
#[must_use]
pub fn any_sensitive(marker: &Value) -> bool {
    match marker {
        Value::Bool(b) => *b,
        Value::Array(items) => items.iter().any(any_sensitive),
        Value::Object(map) => map.values().any(any_sensitive),
        _ => false,
    }
}
