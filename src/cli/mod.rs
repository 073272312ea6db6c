//! CLI module for the plan commenter.
//!
//! This module provides the command-line definition and the stderr
//! feedback printed around a run.

mod commands;
mod output;

pub use commands::{Cli, LogFormat};
pub use output::{format_outcome, format_summary, success};
