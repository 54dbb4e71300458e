//! Organization suite: search and read coverage for Organization resources.

use probe_client::{Error, StatusCode};
use probe_report::Ledger;

use super::checks::{record_bundle_search, record_expected_error, OnHttpError, Verdict};
use super::{read_by_id, SuiteContext};

pub async fn run(ctx: &mut SuiteContext<'_>) -> Result<Ledger, Error> {
    let mut ledger = Ledger::new();

    ctx.section("Organization Search Tests");

    let response = ctx
        .client
        .get("/Organization", &[("_summary", "true"), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Organization",
        "Search all Organizations with summary",
        "No Organizations found",
        OnHttpError::Fail,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} Organization(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/Organization", &[("name", "health"), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Organization",
        "Search Organization by name",
        "No Organizations matching name",
        OnHttpError::Fail,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} Organization(s) by name", entries.len()));
    }

    // Identifier search keyed on the configured test prefix; an empty result
    // only means no fixtures are present on this server.
    let prefix = ctx.config.test_identifier_prefix.clone();
    let response = ctx
        .client
        .get("/Organization", &[("identifier", prefix.as_str()), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Organization",
        "Search Organization by test identifier",
        "No test Organizations present",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} test Organization(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/Organization", &[("_sort", "name"), ("_count", "3")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Organization",
        "Search Organization sorted by name",
        "No Organizations found",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Sorted search returned {} Organization(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/Organization", &[("active", "true"), ("_count", "3")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Organization",
        "Search Organization by active=true",
        "No active Organizations found",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} active Organization(s)", entries.len()));
    }

    read_by_id(ctx, &mut ledger, "Organization").await?;

    ctx.section("Organization Error Tests");

    let missing = format!("/Organization/{}does-not-exist", ctx.config.test_identifier_prefix);
    let response = ctx.client.get(&missing, &[]).await?;
    if record_expected_error(
        &mut ledger,
        &response,
        "Read nonexistent Organization",
        &[StatusCode::NOT_FOUND, StatusCode::GONE],
    ) == Verdict::Pass
    {
        ctx.note("Nonexistent Organization correctly not found");
    }

    Ok(ledger)
}
