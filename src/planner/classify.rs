//! Classification of primitive actions into one semantic change type.

use serde::{Deserialize, Serialize};

use super::document::Action;

/// Semantic change applied to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Resource will be created.
    Create,
    /// Resource will be updated in place.
    Update,
    /// Resource will be destroyed and created again.
    Recreate,
    /// Resource will be destroyed.
    Delete,
}

/// Determines the change type for a set of primitive actions.
///
/// Duplicates are irrelevant; only presence of create, delete and update
/// matters. Combinations outside the known table fall back to
/// [`ChangeType::Update`].
#[must_use]
pub fn classify(actions: &[Action]) -> ChangeType {
    let has = |wanted: Action| actions.contains(&wanted);
    let (create, delete, update) = (has(Action::Create), has(Action::Delete), has(Action::Update));

    match (create, delete, update) {
        (true, false, false) => ChangeType::Create,
        (false, true, false) => ChangeType::Delete,
        (true, true, false) => ChangeType::Recreate,
        _ => ChangeType::Update,
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Recreate => "recreate",
            Self::Delete => "delete",
        };
        write!(f, "{s}")
    }
}
