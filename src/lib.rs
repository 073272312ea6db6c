// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![forbid(unsafe_code)]               // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Terraform Plan Commenter
//!
//! Summarises Terraform plans and keeps a single comment on a GitLab merge
//! request up to date with the result.
//!
//! ## Overview
//!
//! A run reads one or more plan documents (`terraform show -json`),
//! classifies every resource change, computes a field-level diff with
//! sensitive values redacted, and renders a Markdown report. The report is
//! either written to a file or stdout, or upserted as an internal note on
//! the merge request. Rendering is deterministic, so re-running against an
//! unchanged plan leaves the existing note alone.
//!
//! ## Modules
//!
//! - [`planner`]: Plan document model, classification, diff and aggregation
//! - [`report`]: Markdown and JSON rendering, output writer
//! - [`gitlab`]: GitLab notes client and comment upsert
//! - [`config`]: Environment-driven settings
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```no_run
//! use tfplan_commenter::planner::PlanProcessor;
//! use tfplan_commenter::report::render_markdown;
//!
//! # fn main() -> tfplan_commenter::Result<()> {
//! let report = PlanProcessor::new().process_many(&["plans/network.json"])?;
//! let body = render_markdown(&report);
//! assert!(body.starts_with("## Terraform Plan Summary"));
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod planner;
pub mod report;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::Cli;
pub use config::Settings;
pub use error::{CommenterError, Result};
pub use gitlab::{CommentPublisher, GitLabClient, NoteClient, PublishOutcome};
pub use planner::{MultiPlanReport, PlanProcessor};
pub use report::{render, ReportFormat};
