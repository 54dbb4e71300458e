use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use probe_client::FhirClient;

mod config;
mod runner;
mod suites;

use crate::config::ProbeConfig;
use crate::runner::SuiteKind;

#[derive(Parser)]
#[command(
    name = "fhir-probe",
    about = "Integration test harness for remote FHIR terminology endpoints",
    version,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run test suites against the configured FHIR server.
    Run {
        /// Base URL of the server under test (overrides configuration).
        #[arg(long)]
        base_url: Option<String>,
        /// Request timeout in seconds (overrides configuration).
        #[arg(long)]
        timeout: Option<u64>,
        /// Suite to run; all suites when omitted. Repeatable.
        #[arg(short, long = "suite", value_enum)]
        suites: Vec<SuiteKind>,
        /// Suppress per-test progress notes.
        #[arg(long, action = ArgAction::SetTrue)]
        quiet: bool,
        /// Delete resources created by the suites once the run completes.
        #[arg(long, action = ArgAction::SetTrue)]
        cleanup: bool,
    },

    /// List available test suites.
    List,

    /// Print CLI version.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
        Commands::List => {
            for suite in SuiteKind::all() {
                println!("{}", suite.title());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run {
            base_url,
            timeout,
            suites,
            quiet,
            cleanup,
        } => {
            let mut config = ProbeConfig::load().context("Failed to load configuration")?;
            if let Some(base_url) = base_url {
                config.base_url = base_url;
            }
            if let Some(timeout) = timeout {
                config.request_timeout_seconds = timeout;
            }
            if quiet {
                config.verbose = false;
            }
            if cleanup {
                config.cleanup_after_tests = true;
            }
            config
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

            let client = FhirClient::new(&config.base_url, config.request_timeout())
                .context("Failed to construct FHIR client")?;

            let selected = if suites.is_empty() {
                SuiteKind::all().to_vec()
            } else {
                suites
            };

            let report = runner::run_suites(&client, &config, &selected)
                .await
                .context("Test run aborted by an unexpected error")?;

            Ok(if report.summary().overall_success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
