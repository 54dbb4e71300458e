//! Test-group functions, one per FHIR resource family.
//!
//! Every test issues one or more requests, branches on the status code, and
//! records exactly one outcome. Assertion mismatches and ambiguous server
//! behavior stay local to the test; transport errors propagate out of the
//! suite via `?` and abort the whole run.

pub mod checks;
pub mod organization;
pub mod patient;
pub mod practitioner;
pub mod terminology;

use probe_client::bundle::str_field;
use probe_client::{FhirClient, StatusCode};
use probe_report::render::style;
use probe_report::Ledger;

use crate::config::ProbeConfig;

/// Shared per-run state handed to every suite.
pub struct SuiteContext<'a> {
    pub client: &'a FhirClient,
    pub config: &'a ProbeConfig,
    /// `(resource type, id)` pairs of resources a suite created, kept for the
    /// post-run cleanup pass. The search-and-read suites leave this empty.
    pub created: Vec<(String, String)>,
}

impl<'a> SuiteContext<'a> {
    pub fn new(client: &'a FhirClient, config: &'a ProbeConfig) -> Self {
        Self {
            client,
            config,
            created: Vec::new(),
        }
    }

    /// Bold section header within a suite.
    pub fn section(&self, title: &str) {
        println!("\n{}{}{}", style::BOLD, title, style::RESET);
    }

    /// Cyan progress note, suppressed unless verbose output is enabled.
    pub fn note(&self, message: impl AsRef<str>) {
        if self.config.verbose {
            println!("  {}→ {}{}", style::CYAN, message.as_ref(), style::RESET);
        }
    }
}

/// Read any instance of `resource_type` by id, seeded from a one-entry
/// search. Shared by the administrative suites.
pub(crate) async fn read_by_id(
    ctx: &SuiteContext<'_>,
    ledger: &mut Ledger,
    resource_type: &str,
) -> probe_client::Result<()> {
    let label = format!("Read {resource_type} by ID");
    let path = format!("/{resource_type}");

    let response = ctx.client.get(&path, &[("_count", "1")]).await?;
    if response.status != StatusCode::OK {
        ledger.record_fail(label.as_str(), format!("Search failed: {}", response.status));
        return Ok(());
    }
    let Some(seed) = checks::first_entry(&response, resource_type) else {
        ledger.record_skip(label.as_str(), format!("No {resource_type} to read"));
        return Ok(());
    };
    let Some(id) = str_field(&seed, "id") else {
        ledger.record_skip(label.as_str(), format!("No id in {resource_type}"));
        return Ok(());
    };

    let response = ctx.client.get(&format!("/{resource_type}/{id}"), &[]).await?;
    if response.status != StatusCode::OK {
        ledger.record_fail(label.as_str(), format!("Status {}", response.status));
        return Ok(());
    }
    if response.resource_type() == Some(resource_type) {
        ctx.note(format!("Read {resource_type}/{id}"));
        ledger.record_pass(label.as_str());
    } else {
        ledger.record_fail(label.as_str(), "Unexpected resource type in response");
    }
    Ok(())
}
