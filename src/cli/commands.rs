//! CLI argument definitions.
//!
//! This module defines the command line using clap.

use clap::Parser;

use crate::report::ReportFormat;

/// Post a Terraform plan summary to a GitLab merge request.
#[derive(Parser, Debug)]
#[command(name = "tfplan-commenter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Terraform plan files in JSON format (`terraform show -json`).
    #[arg(value_name = "PLAN_FILE", required = true, num_args = 1..)]
    pub plan_files: Vec<String>,

    /// Write the report to this destination instead of posting ('-' = stdout).
    #[arg(short, long, value_name = "DEST")]
    pub output: Option<String>,

    /// Report format; `json` is only valid together with `--output`.
    #[arg(
        short,
        long,
        value_enum,
        default_value_t = ReportFormat::Markdown,
        requires_if("json", "output")
    )]
    pub format: ReportFormat,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Print a per-plan change-count table to stderr.
    #[arg(long)]
    pub summary: bool,

    /// Decide whether to create or update the comment without doing it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["tfplan-commenter", "plan.json"]).unwrap();
        assert_eq!(cli.plan_files, vec!["plan.json"]);
        assert_eq!(cli.format, ReportFormat::Markdown);
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(cli.output.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "tfplan-commenter",
            "-o",
            "-",
            "--format",
            "json",
            "-v",
            "--log-format",
            "json",
            "--summary",
            "--dry-run",
            "a.json",
            "b.json",
        ])
        .unwrap();
        assert_eq!(cli.output.as_deref(), Some("-"));
        assert_eq!(cli.format, ReportFormat::Json);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.verbose && cli.summary && cli.dry_run);
        assert_eq!(cli.plan_files, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_json_format_requires_output() {
        let err = Cli::try_parse_from(["tfplan-commenter", "--format", "json", "plan.json"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from(["tfplan-commenter", "-f", "markdown", "plan.json"]).unwrap();
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_plan_file_required() {
        assert!(Cli::try_parse_from(["tfplan-commenter"]).is_err());
    }
}
