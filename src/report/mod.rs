//! Report rendering and output.
//!
//! This module turns a [`MultiPlanReport`] into the comment body and writes
//! it to a file or stdout.

mod markdown;
mod output;

pub use markdown::{render_markdown, sub, summary_line};
pub use output::{destination_label, write};

use serde::{Deserialize, Serialize};

use crate::error::{CommenterError, Result};
use crate::planner::MultiPlanReport;

/// Header every rendered report starts with; used to find a prior comment.
pub const PLAN_SUMMARY_HEADER: &str = "## Terraform Plan Summary";

/// Shown for a plan without changes.
pub const NO_CHANGES_MESSAGE: &str = "No changes detected.";

/// Shown when no plan has changes.
pub const NO_CHANGES_ACROSS_ALL_PLANS: &str = "No changes detected across all plans.";

/// Destination that writes to standard output.
pub const STDOUT_DESTINATION: &str = "-";

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ReportFormat {
    /// Markdown comment body.
    #[default]
    Markdown,
    /// The raw report as JSON.
    Json,
}

/// Renders a report in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(report: &MultiPlanReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Markdown => Ok(render_markdown(report)),
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| CommenterError::Render(e.to_string())),
    }
}

/// Collapses all whitespace runs to single spaces.
///
/// Two bodies that normalize equally are considered the same comment.
#[must_use]
pub fn normalize_whitespace(body: &str) -> String {
    body.split_whitespace().collect::<Vec<_>>().join(" ")
}
