//! Terminal feedback for the CLI.
//!
//! Everything here goes to stderr; stdout is reserved for the report when
//! the destination is `-`.

use colored::Colorize;
use tabled::{Table, Tabled};

use crate::gitlab::PublishOutcome;
use crate::planner::MultiPlanReport;

/// Per-plan change counts for table display.
#[derive(Tabled)]
struct PlanSummaryRow {
    #[tabled(rename = "Plan")]
    plan: String,
    #[tabled(rename = "Create")]
    create: usize,
    #[tabled(rename = "Update")]
    update: usize,
    #[tabled(rename = "Recreate")]
    recreate: usize,
    #[tabled(rename = "Delete")]
    delete: usize,
}

/// Formats the change-count table for all plans.
#[must_use]
pub fn format_summary(report: &MultiPlanReport) -> String {
    let rows: Vec<PlanSummaryRow> = report
        .plans
        .iter()
        .map(|plan| PlanSummaryRow {
            plan: plan.identity.name.clone(),
            create: plan.report.created.len(),
            update: plan.report.updated.len(),
            recreate: plan.report.recreated.len(),
            delete: plan.report.deleted.len(),
        })
        .collect();

    Table::new(rows).to_string()
}

/// Formats the line reported after a publish run.
#[must_use]
pub fn format_outcome(outcome: &PublishOutcome) -> String {
    match outcome {
        PublishOutcome::Created { note_id } => {
            format!("{} Created plan summary note {note_id}", "✓".green())
        }
        PublishOutcome::Updated { note_id } => {
            format!("{} Updated plan summary note {note_id}", "✓".green())
        }
        PublishOutcome::Unchanged { note_id } => {
            format!("{} Plan summary note {note_id} already up to date", "✓".green())
        }
        PublishOutcome::Skipped(decision) => {
            format!("{} Dry run: would {decision}", "⚠".yellow())
        }
    }
}

/// Prints a success message to stderr.
pub fn success(message: &str) {
    eprintln!("{} {message}", "✓".green());
}
