//! Field-level diff between the before and after snapshots of a resource.
//!
//! Only top-level attribute keys are compared. A change anywhere inside a
//! nested attribute is reported as one `changed` entry carrying both whole
//! values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::sensitivity::{Sensitivity, REDACTED};
use super::value::{render_value, values_equal};

/// Kind of attribute difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Key only present after the change.
    Added,
    /// Key only present before the change.
    Removed,
    /// Key present on both sides with different values.
    Changed,
}

/// A single attribute difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Top-level attribute name.
    pub key: String,
    /// Value before the change (absent for additions).
    pub before: Option<Value>,
    /// Value after the change (absent for removals).
    pub after: Option<Value>,
    /// Kind of difference.
    pub kind: DiffKind,
}

impl DiffEntry {
    /// Rendered before value (`null` when absent).
    #[must_use]
    pub fn before_text(&self) -> String {
        render_value(self.before.as_ref())
    }

    /// Rendered after value (`null` when absent).
    #[must_use]
    pub fn after_text(&self) -> String {
        render_value(self.after.as_ref())
    }

    /// Formats the entry as unified-diff style lines.
    ///
    /// A changed key produces a `-` line followed by a `+` line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self.kind {
            DiffKind::Added => vec![format!("+{}: {}", self.key, self.after_text())],
            DiffKind::Removed => vec![format!("-{}: {}", self.key, self.before_text())],
            DiffKind::Changed => vec![
                format!("-{}: {}", self.key, self.before_text()),
                format!("+{}: {}", self.key, self.after_text()),
            ],
        }
    }
}

/// Computes the ordered field diff for one resource.
///
/// Non-object snapshots (including `null`) are treated as empty. Keys are
/// visited in ascending order so output is stable across runs. Sensitive
/// values are replaced by [`REDACTED`] before comparison, so a sensitive
/// field that changed value yields no entry.
#[must_use]
pub fn diff_fields(sensitivity: &Sensitivity<'_>, before: &Value, after: &Value) -> Vec<DiffEntry> {
    let empty = Map::new();
    let before_map = before.as_object().unwrap_or(&empty);
    let after_map = after.as_object().unwrap_or(&empty);

    let keys: BTreeSet<&String> = before_map.keys().chain(after_map.keys()).collect();
    let mut diffs = Vec::with_capacity(keys.len());

    for key in keys {
        let (before_val, after_val) = if sensitivity.is_sensitive(key) {
            let redacted = Value::String(String::from(REDACTED));
            (
                before_map.get(key).map(|_| redacted.clone()),
                after_map.get(key).map(|_| redacted),
            )
        } else {
            (before_map.get(key).cloned(), after_map.get(key).cloned())
        };

        let entry = match (before_val, after_val) {
            (None, Some(after)) => DiffEntry {
                key: key.clone(),
                before: None,
                after: Some(after),
                kind: DiffKind::Added,
            },
            (Some(before), None) => DiffEntry {
                key: key.clone(),
                before: Some(before),
                after: None,
                kind: DiffKind::Removed,
            },
            (Some(before), Some(after)) if !values_equal(&before, &after) => DiffEntry {
                key: key.clone(),
                before: Some(before),
                after: Some(after),
                kind: DiffKind::Changed,
            },
            _ => continue,
        };
        diffs.push(entry);
    }

    diffs
}

impl std::fmt::Display for DiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
        };
        write!(f, "{s}")
    }
}
