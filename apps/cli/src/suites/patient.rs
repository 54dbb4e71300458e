//! Patient suite: search and read coverage for Patient resources.

use probe_client::{Error, StatusCode};
use probe_report::Ledger;

use super::checks::{record_bundle_search, record_expected_error, OnHttpError, Verdict};
use super::{read_by_id, SuiteContext};

pub async fn run(ctx: &mut SuiteContext<'_>) -> Result<Ledger, Error> {
    let mut ledger = Ledger::new();

    ctx.section("Patient Search Tests");

    let response = ctx
        .client
        .get("/Patient", &[("_summary", "true"), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Patient",
        "Search all Patients with summary",
        "No Patients found",
        OnHttpError::Fail,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} Patient(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/Patient", &[("name", "smith"), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Patient",
        "Search Patient by name",
        "No Patients matching name",
        OnHttpError::Fail,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} Patient(s) by name", entries.len()));
    }

    // Gender codes come from the same administrative-gender system the
    // terminology suite validates.
    let response = ctx
        .client
        .get("/Patient", &[("gender", "female"), ("_count", "3")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Patient",
        "Search Patient by gender=female",
        "No matching Patients found",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} Patient(s) by gender", entries.len()));
    }

    let prefix = ctx.config.test_identifier_prefix.clone();
    let response = ctx
        .client
        .get("/Patient", &[("identifier", prefix.as_str()), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Patient",
        "Search Patient by test identifier",
        "No test Patients present",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} test Patient(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/Patient", &[("_sort", "-_lastUpdated"), ("_count", "3")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Patient",
        "Search Patient by last update",
        "No Patients found",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} recently updated Patient(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/Patient", &[("birthdate", "ge1950-01-01"), ("_count", "3")])
        .await?;
    let entries = record_bundle_search(
        &mut ledger,
        &response,
        "Patient",
        "Search Patient by birthdate range",
        "No matching Patients found",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} Patient(s) by birthdate", entries.len()));
    }

    read_by_id(ctx, &mut ledger, "Patient").await?;

    ctx.section("Patient Error Tests");

    let missing = format!("/Patient/{}does-not-exist", ctx.config.test_identifier_prefix);
    let response = ctx.client.get(&missing, &[]).await?;
    if record_expected_error(
        &mut ledger,
        &response,
        "Read nonexistent Patient",
        &[StatusCode::NOT_FOUND, StatusCode::GONE],
    ) == Verdict::Pass
    {
        ctx.note("Nonexistent Patient correctly not found");
    }

    Ok(ledger)
}
