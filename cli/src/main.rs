//! CLI for the accessibility fixer.
//!
//! `file` turns accessibility-scan findings into GitHub issues; `fix` assigns
//! an issue to the automated fixer and reports the pull request it opens.

use a11y_fixer::{
    parse_findings, parse_issues, resolve_settings, set_failed, set_output, RunSummary, Runner,
    RunnerConfig, RunnerError,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Accessibility fixer - File scan findings as issues and track the fixes opened for them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Target repository as owner/name.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// GitHub API root, for GitHub Enterprise servers.
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Path to a TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// File one issue per finding.
    File {
        /// JSON array of findings.
        #[arg(long, env = "A11Y_FIXER_FINDINGS", default_value = "")]
        findings: String,
    },

    /// Assign issues to the fixer and look for the pull requests it opens.
    Fix {
        /// JSON array of issues.
        #[arg(long, env = "A11Y_FIXER_ISSUES", default_value = "")]
        issues: String,
    },
}

impl Command {
    /// Name of the step output this command produces.
    fn output_name(&self) -> &'static str {
        match self {
            Self::File { .. } => "issues",
            Self::Fix { .. } => "fixings",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    let args = Args::parse();
    let output_name = args.command.output_name();

    match run(args).await {
        Ok(summary) => {
            print!("\n{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            set_failed(&e.to_string());
            if let Err(e) = set_output(output_name, "[]") {
                error!(error = %e, "Failed to write empty output");
            }

            if e.is_setup_error() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let settings = resolve_settings(args.config.as_deref())?;
    let mut config = RunnerConfig::new(args.token, args.repository).with_settings(settings);
    if let Some(api_url) = args.api_url {
        config = config.with_api_url(api_url);
    }

    match args.command {
        Command::File { findings } => {
            info!("Started 'file' run");
            debug!(findings = %findings, "Input");
            let findings = parse_findings(&findings)?;
            let runner = Runner::new(config)?;

            let report = runner.file(findings).await?;
            let issues = serde_json::to_string(&report.issues)?;
            set_output("issues", &issues)?;
            debug!(issues = %issues, "Output");

            info!("Finished 'file' run");
            Ok(report.summary)
        }
        Command::Fix { issues } => {
            info!("Started 'fix' run");
            debug!(issues = %issues, "Input");
            let issues = parse_issues(&issues)?;
            let runner = Runner::new(config)?;

            let report = runner.fix(issues).await?;
            let fixings = serde_json::to_string(&report.fixings)?;
            set_output("fixings", &fixings)?;
            debug!(fixings = %fixings, "Output");

            info!("Finished 'fix' run");
            Ok(report.summary)
        }
    }
}
