//! Plan-diff engine.
//!
//! This module turns Terraform plan documents into categorized, sorted,
//! field-level reports:
//! - Classifying primitive actions into a change type
//! - Redacting sensitive attributes
//! - Diffing top-level attributes per resource
//! - Aggregating one or many plans

mod classify;
mod diff;
mod document;
mod plan;
mod processor;
mod sensitivity;
mod value;

pub use classify::{classify, ChangeType};
pub use diff::{diff_fields, DiffEntry, DiffKind};
pub use document::{Action, Change, FilePlanLoader, PlanDocument, PlanLoader, ResourceChange};
pub use plan::{PlanReport, ResourceReport, BUCKET_ORDER};
pub use processor::{
    plan_name, process_documents, IdentifiedPlan, MultiPlanReport, PlanIdentity, PlanProcessor,
};
pub use sensitivity::{any_sensitive, Sensitivity, REDACTED};
pub use value::{render_value, values_equal};
