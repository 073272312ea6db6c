//! tfplan-commenter CLI entrypoint.
//!
//! Reads Terraform plan files, renders the summary and either writes it out
//! or upserts it as a GitLab merge request note.

use std::process::ExitCode;

use tfplan_commenter::cli::{self, Cli, LogFormat};
use tfplan_commenter::config::{load_dotenv, Settings};
use tfplan_commenter::error::Result;
use tfplan_commenter::gitlab::{CommentPublisher, GitLabClient};
use tfplan_commenter::planner::{MultiPlanReport, PlanProcessor};
use tfplan_commenter::report::{self, destination_label, ReportFormat};

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    init_logging(cli.verbose, cli.log_format);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system on stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flag when set.
fn init_logging(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(args: &Cli) -> Result<()> {
    let plans = PlanProcessor::new().process_many(args.plan_files.as_slice())?;
    debug!(
        "Processed {} plans, changes detected: {}",
        plans.plans.len(),
        plans.has_changes
    );

    if args.summary {
        eprintln!("{}", cli::format_summary(&plans));
    }

    match &args.output {
        Some(destination) => {
            let body = report::render(&plans, args.format)?;
            report::write(&body, destination)?;
            cli::success(&format!(
                "{} output written to {}",
                format_label(args.format),
                destination_label(destination)
            ));
            Ok(())
        }
        None => post_comment(args, &plans),
    }
}

/// Upserts the Markdown report as a merge request note.
///
/// The note is always Markdown so the summary header stays first.
fn post_comment(args: &Cli, plans: &MultiPlanReport) -> Result<()> {
    let body = report::render_markdown(plans);
    load_dotenv(None)?;
    let settings = Settings::from_env()?;
    debug!("Using settings: {settings:?}");

    let client = GitLabClient::new(&settings)?;
    let publisher = CommentPublisher::new(client).with_dry_run(args.dry_run);

    info!(
        "Posting summary of {} plans to merge request !{}",
        plans.plans.len(),
        settings.merge_request_iid
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(publisher.publish(&body))?;

    eprintln!("{}", cli::format_outcome(&outcome));
    Ok(())
}

const fn format_label(format: ReportFormat) -> &'static str {
    match format {
        ReportFormat::Markdown => "Markdown",
        ReportFormat::Json => "JSON",
    }
}
