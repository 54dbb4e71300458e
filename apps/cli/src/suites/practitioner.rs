//! Practitioner suite: Practitioner and PractitionerRole search coverage.

use probe_client::{Error, StatusCode};
use probe_report::Ledger;

use super::checks::{record_bundle_search, record_expected_error, OnHttpError, Verdict};
use super::{read_by_id, SuiteContext};

pub async fn run(ctx: &mut SuiteContext<'_>) -> Result<Ledger, Error> {
    let mut ledger = Ledger::new();

    ctx.section("Practitioner Search Tests");

    let response = ctx
        .client
        .get("/Practitioner", &[("_summary", "true"), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Practitioner",
        "Search all Practitioners with summary",
        "No Practitioners found",
        OnHttpError::Fail,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} Practitioner(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/Practitioner", &[("name", "smith"), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Practitioner",
        "Search Practitioner by name",
        "No Practitioners matching name",
        OnHttpError::Fail,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} Practitioner(s) by name", entries.len()));
    }

    let prefix = ctx.config.test_identifier_prefix.clone();
    let response = ctx
        .client
        .get("/Practitioner", &[("identifier", prefix.as_str()), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Practitioner",
        "Search Practitioner by test identifier",
        "No test Practitioners present",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} test Practitioner(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/Practitioner", &[("_sort", "family"), ("_count", "3")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Practitioner",
        "Search Practitioner sorted by family name",
        "No Practitioners found",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Sorted search returned {} Practitioner(s)", entries.len()));
    }

    read_by_id(ctx, &mut ledger, "Practitioner").await?;

    ctx.section("PractitionerRole Tests");

    let response = ctx
        .client
        .get("/PractitionerRole", &[("_summary", "true"), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "PractitionerRole",
        "Search all PractitionerRoles with summary",
        "No PractitionerRoles found",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} PractitionerRole(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/PractitionerRole", &[("_sort", "-_lastUpdated"), ("_count", "3")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "PractitionerRole",
        "Search PractitionerRole by last update",
        "No PractitionerRoles found",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} recently updated PractitionerRole(s)", entries.len()));
    }

    ctx.section("Practitioner Error Tests");

    let missing = format!("/Practitioner/{}does-not-exist", ctx.config.test_identifier_prefix);
    let response = ctx.client.get(&missing, &[]).await?;
    if record_expected_error(
        &mut ledger,
        &response,
        "Read nonexistent Practitioner",
        &[StatusCode::NOT_FOUND, StatusCode::GONE],
    ) == Verdict::Pass
    {
        ctx.note("Nonexistent Practitioner correctly not found");
    }

    Ok(ledger)
}
