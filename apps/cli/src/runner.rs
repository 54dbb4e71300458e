//! Sequential suite runner and console report.
//!
//! Suites run one at a time, one request in flight at a time. An unexpected
//! error from any suite aborts the entire run immediately; assertion
//! failures never do.

use std::time::{Duration, Instant};

use probe_client::FhirClient;
use probe_report::render::{self, style};
use probe_report::Ledger;

use crate::config::ProbeConfig;
use crate::suites::{self, SuiteContext};

const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SuiteKind {
    Organization,
    Practitioner,
    Patient,
    Terminology,
}

impl SuiteKind {
    pub fn all() -> [SuiteKind; 4] {
        [
            SuiteKind::Organization,
            SuiteKind::Practitioner,
            SuiteKind::Patient,
            SuiteKind::Terminology,
        ]
    }

    pub fn title(self) -> &'static str {
        match self {
            SuiteKind::Organization => "Organization",
            SuiteKind::Practitioner => "Practitioner",
            SuiteKind::Patient => "Patient",
            SuiteKind::Terminology => "Terminology",
        }
    }
}

/// Run the selected suites in order and return the merged ledger.
pub async fn run_suites(
    client: &FhirClient,
    config: &ProbeConfig,
    selected: &[SuiteKind],
) -> probe_client::Result<Ledger> {
    print_header(config);
    let started = Instant::now();

    let mut ctx = SuiteContext::new(client, config);
    let mut ledgers = Vec::new();

    for kind in selected {
        match run_suite(*kind, &mut ctx).await {
            Ok(ledger) => {
                ledgers.push(ledger);
                print_separator();
            }
            Err(error) => {
                println!(
                    "\n{}{} tests aborted: {}{}",
                    style::RED,
                    kind.title(),
                    error,
                    style::RESET
                );
                return Err(error);
            }
        }
    }

    if config.cleanup_after_tests {
        cleanup(&mut ctx).await?;
    }

    let elapsed = started.elapsed();
    let mut total = Ledger::new();
    for ledger in ledgers {
        total.merge(ledger);
    }

    print_aggregate(&total, selected.len(), elapsed);
    Ok(total)
}

async fn run_suite(
    kind: SuiteKind,
    ctx: &mut SuiteContext<'_>,
) -> probe_client::Result<Ledger> {
    println!(
        "\n{}=== {} Tests ==={}",
        style::BOLD,
        kind.title(),
        style::RESET
    );
    tracing::info!(suite = kind.title(), "running suite");

    match kind {
        SuiteKind::Organization => suites::organization::run(ctx).await,
        SuiteKind::Practitioner => suites::practitioner::run(ctx).await,
        SuiteKind::Patient => suites::patient::run(ctx).await,
        SuiteKind::Terminology => suites::terminology::run(ctx).await,
    }
}

/// Delete whatever the suites created. The search-and-read suites create
/// nothing, so this is usually a no-op.
async fn cleanup(ctx: &mut SuiteContext<'_>) -> probe_client::Result<()> {
    let created = std::mem::take(&mut ctx.created);
    if created.is_empty() {
        tracing::debug!("cleanup enabled, no created resources to delete");
        return Ok(());
    }

    for (resource_type, id) in created {
        let path = format!("/{resource_type}/{id}");
        let snapshot = ctx.client.delete(&path).await?;
        tracing::debug!(status = %snapshot.status, path, "deleted test resource");
    }
    Ok(())
}

fn print_header(config: &ProbeConfig) {
    println!("\n{}{}{}", style::BOLD, "=".repeat(RULE_WIDTH), style::RESET);
    println!("{}FHIR API Test Suite{}", style::BOLD, style::RESET);
    println!("{}{}{}", style::BOLD, "=".repeat(RULE_WIDTH), style::RESET);
    println!(
        "\nTesting against: {}{}{}\n",
        style::BLUE,
        config.base_url,
        style::RESET
    );
}

fn print_separator() {
    println!("\n{}{}{}\n", style::BOLD, "-".repeat(RULE_WIDTH), style::RESET);
}

fn print_aggregate(total: &Ledger, suite_count: usize, elapsed: Duration) {
    println!("\n{}{}{}", style::BOLD, "=".repeat(RULE_WIDTH), style::RESET);
    println!("{}Overall Test Results{}", style::BOLD, style::RESET);
    println!("{}{}{}", style::BOLD, "=".repeat(RULE_WIDTH), style::RESET);
    println!("\nTest Suites Run: {suite_count}");
    println!("Time Elapsed: {:.2} seconds", elapsed.as_secs_f64());

    render::print_summary(total);

    if total.summary().overall_success {
        println!(
            "\n{}{}✓ All tests passed!{}\n",
            style::GREEN,
            style::BOLD,
            style::RESET
        );
    } else {
        println!(
            "\n{}{}✗ Some tests failed{}\n",
            style::RED,
            style::BOLD,
            style::RESET
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn transport_error_aborts_the_run() {
        // Nothing listens on the discard port; the first request fails with
        // a connection error (or times out) before any outcome is recorded.
        let config = ProbeConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            verbose: false,
            request_timeout_seconds: 1,
            ..ProbeConfig::default()
        };
        let client =
            FhirClient::new(&config.base_url, config.request_timeout()).expect("valid base URL");

        let result = run_suites(&client, &config, &[SuiteKind::Organization]).await;
        assert!(matches!(result, Err(probe_client::Error::Transport(_))));
    }
}
