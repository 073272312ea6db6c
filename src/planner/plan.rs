//! Per-plan aggregation of resource changes into categorized reports.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlanError;

use super::classify::{classify, ChangeType};
use super::diff::{diff_fields, DiffEntry};
use super::document::ResourceChange;
use super::sensitivity::Sensitivity;

/// Diff report for a single resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceReport {
    /// Resource address.
    pub address: String,
    /// Classified change type.
    pub change_type: ChangeType,
    /// Attribute differences, sorted by key.
    pub diffs: Vec<DiffEntry>,
}

impl ResourceReport {
    /// Builds the report for one resource change.
    #[must_use]
    pub fn from_change(change: &ResourceChange, change_type: ChangeType) -> Self {
        let sensitivity =
            Sensitivity::new(&change.change.before_sensitive, &change.change.after_sensitive);
        Self {
            address: change.address.clone(),
            change_type,
            diffs: diff_fields(&sensitivity, &change.change.before, &change.change.after),
        }
    }

    /// All diff lines of this resource, in key order.
    #[must_use]
    pub fn formatted_diffs(&self) -> Vec<String> {
        self.diffs.iter().flat_map(DiffEntry::lines).collect()
    }
}

/// Categorized report for one plan document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    /// True if any bucket is non-empty.
    pub has_changes: bool,
    /// Resources to create.
    pub created: Vec<ResourceReport>,
    /// Resources to update in place.
    pub updated: Vec<ResourceReport>,
    /// Resources to replace.
    pub recreated: Vec<ResourceReport>,
    /// Resources to destroy.
    pub deleted: Vec<ResourceReport>,
}

impl PlanReport {
    /// Aggregates the resource changes of one plan.
    ///
    /// Records without actions are skipped. Each bucket is sorted by address;
    /// duplicate addresses are kept as-is.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::EmptyInput`] if the document had no
    /// resource-change collection at all. An empty collection is a valid
    /// plan without changes.
    pub fn from_changes(changes: Option<&[ResourceChange]>) -> Result<Self, PlanError> {
        let changes = changes.ok_or(PlanError::EmptyInput)?;

        let mut buckets: [Vec<&ResourceChange>; 4] = Default::default();
        for change in changes {
            if change.change.actions.is_empty() {
                debug!("Skipping {} with no actions", change.address);
                continue;
            }
            buckets[bucket_index(classify(&change.change.actions))].push(change);
        }

        let [created, updated, recreated, deleted] = buckets.map(|mut bucket| {
            bucket.sort_by(|a, b| a.address.cmp(&b.address));
            bucket
        });

        let report = Self {
            has_changes: !(created.is_empty()
                && updated.is_empty()
                && recreated.is_empty()
                && deleted.is_empty()),
            created: build_reports(&created, ChangeType::Create),
            updated: build_reports(&updated, ChangeType::Update),
            recreated: build_reports(&recreated, ChangeType::Recreate),
            deleted: build_reports(&deleted, ChangeType::Delete),
        };

        debug!(
            "Plan aggregated: {} to create, {} to update, {} to recreate, {} to delete",
            report.created.len(),
            report.updated.len(),
            report.recreated.len(),
            report.deleted.len()
        );

        Ok(report)
    }

    /// Returns the bucket for a change type.
    #[must_use]
    pub fn bucket(&self, change_type: ChangeType) -> &[ResourceReport] {
        match change_type {
            ChangeType::Create => &self.created,
            ChangeType::Update => &self.updated,
            ChangeType::Recreate => &self.recreated,
            ChangeType::Delete => &self.deleted,
        }
    }

    /// Total number of resources across all buckets.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.created.len() + self.updated.len() + self.recreated.len() + self.deleted.len()
    }
}

/// Bucket order used throughout reporting.
pub const BUCKET_ORDER: [ChangeType; 4] = [
    ChangeType::Create,
    ChangeType::Update,
    ChangeType::Recreate,
    ChangeType::Delete,
];

const fn bucket_index(change_type: ChangeType) -> usize {
    match change_type {
        ChangeType::Create => 0,
        ChangeType::Update => 1,
        ChangeType::Recreate => 2,
        ChangeType::Delete => 3,
    }
}

fn build_reports(changes: &[&ResourceChange], change_type: ChangeType) -> Vec<ResourceReport> {
    changes
        .iter()
        .map(|change| ResourceReport::from_change(change, change_type))
        .collect()
}
