//! Multi-plan processing.
//!
//! Runs the per-plan aggregation over several documents in input order and
//! tags each result with an identity derived from its source path. Any
//! failure aborts the whole run.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PlanError;

use super::document::{FilePlanLoader, PlanDocument, PlanLoader};
use super::plan::PlanReport;

/// Identity of one plan within a multi-plan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanIdentity {
    /// Display name derived from the source path.
    pub name: String,
    /// Source path as given.
    pub source_path: String,
    /// Position in the input list.
    pub index: usize,
}

impl PlanIdentity {
    /// Builds the identity for the plan at `index` loaded from `source_path`.
    #[must_use]
    pub fn new(source_path: &str, index: usize) -> Self {
        Self {
            name: plan_name(source_path),
            source_path: source_path.to_string(),
            index,
        }
    }
}

/// A plan report tagged with its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedPlan {
    /// Which plan this is.
    pub identity: PlanIdentity,
    /// The aggregated report.
    pub report: PlanReport,
}

/// Reports for all plans of a run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiPlanReport {
    /// True if any plan has changes.
    pub has_changes: bool,
    /// Per-plan reports.
    pub plans: Vec<IdentifiedPlan>,
}

/// Derives a plan name from its source path.
///
/// Takes the last `/`-separated segment and strips a trailing `.json`.
/// An empty path yields `unknown`.
#[must_use]
pub fn plan_name(source_path: &str) -> String {
    if source_path.is_empty() {
        return String::from("unknown");
    }
    let file_name = source_path.rsplit('/').next().unwrap_or(source_path);
    file_name
        .strip_suffix(".json")
        .unwrap_or(file_name)
        .to_string()
}

/// Processes plan documents obtained from a [`PlanLoader`].
#[derive(Debug, Default)]
pub struct PlanProcessor<L = FilePlanLoader> {
    loader: L,
}

impl PlanProcessor<FilePlanLoader> {
    /// Creates a processor that reads plans from disk.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            loader: FilePlanLoader::new(),
        }
    }
}

impl<L: PlanLoader> PlanProcessor<L> {
    /// Creates a processor backed by a custom loader.
    pub const fn with_loader(loader: L) -> Self {
        Self { loader }
    }

    /// Loads and aggregates every source, in order.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NoInputFiles`] for an empty list, or the first
    /// load/process failure wrapped with its source path.
    pub fn process_many<S: AsRef<str>>(&self, sources: &[S]) -> Result<MultiPlanReport, PlanError> {
        if sources.is_empty() {
            return Err(PlanError::NoInputFiles);
        }

        let mut multi = MultiPlanReport::default();
        for (index, source) in sources.iter().enumerate() {
            let source = source.as_ref();
            info!("Loading plan: {source}");
            let document = self
                .loader
                .load(source)
                .map_err(|cause| PlanError::load(source, cause))?;
            multi.push(&document, source, index)?;
        }

        Ok(multi)
    }
}

impl MultiPlanReport {
    /// Aggregates one document and appends it as the plan at `index`.
    fn push(&mut self, document: &PlanDocument, source: &str, index: usize) -> Result<(), PlanError> {
        let report = PlanReport::from_changes(document.resource_changes.as_deref())
            .map_err(|cause| PlanError::process(source, cause))?;

        let identity = PlanIdentity::new(source, index);
        debug!(
            "Plan {} ({}) has {} resource changes",
            identity.name,
            identity.source_path,
            report.resource_count()
        );

        self.has_changes |= report.has_changes;
        self.plans.push(IdentifiedPlan { identity, report });
        Ok(())
    }
}

/// Aggregates already-loaded documents, tagging each with its source path.
///
/// # Errors
///
/// Returns [`PlanError::NoInputFiles`] for an empty input, or
/// [`PlanError::Process`] naming the first document that fails.
pub fn process_documents<'a, I>(documents: I) -> Result<MultiPlanReport, PlanError>
where
    I: IntoIterator<Item = (PlanDocument, &'a str)>,
{
    let mut multi = MultiPlanReport::default();
    for (index, (document, source)) in documents.into_iter().enumerate() {
        multi.push(&document, source, index)?;
    }

    if multi.plans.is_empty() {
        return Err(PlanError::NoInputFiles);
    }

    Ok(multi)
}
