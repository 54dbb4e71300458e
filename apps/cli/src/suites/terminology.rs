//! Terminology suite: CodeSystem, ValueSet, and ConceptMap searches plus the
//! $expand, $validate-code, and $lookup operations.

use probe_client::bundle::{extract_entries, find_parameter, link_url, str_field, string_parameter};
use probe_client::{Error, ResponseSnapshot, StatusCode};
use probe_report::Ledger;
use serde_json::Value;

use super::checks::{
    first_entry, record_boolean_result, record_bundle_search, record_expected_error, OnHttpError,
    Verdict,
};
use super::SuiteContext;

const V2_0203_URL: &str = "http://terminology.hl7.org/CodeSystem/v2-0203";
const GENDER_VALUE_SET_URL: &str = "http://hl7.org/fhir/ValueSet/administrative-gender";
const GENDER_SYSTEM_URL: &str = "http://hl7.org/fhir/administrative-gender";

pub async fn run(ctx: &mut SuiteContext<'_>) -> Result<Ledger, Error> {
    let mut ledger = Ledger::new();

    code_system_searches(ctx, &mut ledger).await?;
    value_set_searches(ctx, &mut ledger).await?;
    expand_operations(ctx, &mut ledger).await?;
    validate_code_operations(ctx, &mut ledger).await?;
    lookup_operations(ctx, &mut ledger).await?;
    concept_map_searches(ctx, &mut ledger).await?;
    version_management(ctx, &mut ledger).await?;
    error_scenarios(ctx, &mut ledger).await?;
    additional_search_parameters(ctx, &mut ledger).await?;

    Ok(ledger)
}

async fn code_system_searches(
    ctx: &mut SuiteContext<'_>,
    ledger: &mut Ledger,
) -> Result<(), Error> {
    ctx.section("CodeSystem Tests");

    let response = ctx
        .client
        .get("/CodeSystem", &[("_summary", "true"), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        ledger,
        &response,
        "CodeSystem",
        "Search all CodeSystems with summary",
        "No CodeSystems found",
        OnHttpError::Fail,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} CodeSystem(s)", entries.len()));
    }

    let response = ctx.client.get("/CodeSystem", &[("url", V2_0203_URL)]).await?;
    let entries = record_bundle_search(
        ledger,
        &response,
        "CodeSystem",
        "Search CodeSystem by URL",
        "Specific CodeSystem not found",
        OnHttpError::Fail,
    );
    if let Some(first) = entries.first() {
        ctx.note(format!(
            "Found CodeSystem: {}",
            str_field(first, "name").unwrap_or("Unknown")
        ));
    }

    let response = ctx
        .client
        .get("/CodeSystem", &[("status", "active"), ("_count", "3")])
        .await?;
    let entries = record_bundle_search(
        ledger,
        &response,
        "CodeSystem",
        "Search CodeSystem by status=active",
        "No active CodeSystems found",
        OnHttpError::Fail,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} active CodeSystem(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/CodeSystem", &[("content", "complete"), ("_count", "3")])
        .await?;
    let entries = record_bundle_search(
        ledger,
        &response,
        "CodeSystem",
        "Search CodeSystem by content=complete",
        "No complete CodeSystems found",
        OnHttpError::Fail,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} complete CodeSystem(s)", entries.len()));
    }

    read_by_canonical_url(ctx, ledger, "CodeSystem").await
}

async fn value_set_searches(ctx: &mut SuiteContext<'_>, ledger: &mut Ledger) -> Result<(), Error> {
    ctx.section("ValueSet Tests");

    let response = ctx
        .client
        .get("/ValueSet", &[("_summary", "true"), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        ledger,
        &response,
        "ValueSet",
        "Search all ValueSets with summary",
        "No ValueSets found",
        OnHttpError::Fail,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} ValueSet(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/ValueSet", &[("url", GENDER_VALUE_SET_URL)])
        .await?;
    let entries = record_bundle_search(
        ledger,
        &response,
        "ValueSet",
        "Search ValueSet by URL",
        "Specific ValueSet not found",
        OnHttpError::Fail,
    );
    if let Some(first) = entries.first() {
        ctx.note(format!(
            "Found ValueSet: {}",
            str_field(first, "name").unwrap_or("Unknown")
        ));
    }

    let response = ctx
        .client
        .get("/ValueSet", &[("status", "active"), ("_count", "3")])
        .await?;
    let entries = record_bundle_search(
        ledger,
        &response,
        "ValueSet",
        "Search ValueSet by status=active",
        "No active ValueSets found",
        OnHttpError::Fail,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} active ValueSet(s)", entries.len()));
    }

    read_by_canonical_url(ctx, ledger, "ValueSet").await
}

/// Pick any resource of the given type, then read it back via a search on its
/// canonical URL.
async fn read_by_canonical_url(
    ctx: &SuiteContext<'_>,
    ledger: &mut Ledger,
    resource_type: &str,
) -> Result<(), Error> {
    let label = format!("Read {resource_type} by canonical URL");
    let path = format!("/{resource_type}");

    let response = ctx.client.get(&path, &[("_count", "1")]).await?;
    if response.status != StatusCode::OK {
        ledger.record_fail(label.as_str(), format!("Search failed: {}", response.status));
        return Ok(());
    }
    let Some(seed) = first_entry(&response, resource_type) else {
        ledger.record_skip(label.as_str(), format!("No {resource_type} to read"));
        return Ok(());
    };
    let name = str_field(&seed, "name").unwrap_or("Unknown").to_string();
    let Some(url) = str_field(&seed, "url") else {
        ledger.record_skip(label.as_str(), format!("No URL in {resource_type}"));
        return Ok(());
    };

    let response = ctx.client.get(&path, &[("url", url)]).await?;
    if response.status != StatusCode::OK {
        ledger.record_fail(label.as_str(), format!("Status {}", response.status));
        return Ok(());
    }
    let found = response
        .json()
        .map(|bundle| !extract_entries(bundle, resource_type).is_empty())
        .unwrap_or(false);
    if found {
        ctx.note(format!("Read {resource_type} by URL: {name}"));
        ledger.record_pass(label.as_str());
    } else {
        ledger.record_fail(label.as_str(), "No entry in Bundle");
    }
    Ok(())
}

/// Number of codes in `expansion.contains`, or `None` when the response
/// carries no expansion at all.
fn expansion_size(snapshot: &ResponseSnapshot) -> Option<usize> {
    let expansion = snapshot.json()?.get("expansion")?;
    Some(
        expansion
            .get("contains")
            .and_then(Value::as_array)
            .map_or(0, |codes| codes.len()),
    )
}

fn record_expansion(
    ctx: &SuiteContext<'_>,
    ledger: &mut Ledger,
    snapshot: &ResponseSnapshot,
    label: &str,
    subject: &str,
) {
    match snapshot.status {
        StatusCode::OK => match expansion_size(snapshot) {
            Some(count) => {
                ctx.note(format!("Expanded {subject}: {count} code(s)"));
                ledger.record_pass(label);
            }
            None => ledger.record_fail(label, "No expansion in response"),
        },
        StatusCode::UNPROCESSABLE_ENTITY => {
            ledger.record_skip(label, "Server cannot expand this ValueSet (422)");
        }
        status => ledger.record_skip(label, format!("Status {status}")),
    }
}

async fn expand_operations(ctx: &mut SuiteContext<'_>, ledger: &mut Ledger) -> Result<(), Error> {
    ctx.section("$expand Operation Tests");

    // Instance-level expand against whatever ValueSet the server has.
    let label = "$expand ValueSet by ID";
    let response = ctx.client.get("/ValueSet", &[("_count", "1")]).await?;
    if response.status != StatusCode::OK {
        ledger.record_fail(label, format!("Search failed: {}", response.status));
    } else {
        match first_entry(&response, "ValueSet") {
            None => ledger.record_skip(label, "No ValueSet to expand"),
            Some(seed) => match str_field(&seed, "id") {
                None => ledger.record_skip(label, "No id in ValueSet"),
                Some(id) => {
                    let name = str_field(&seed, "name").unwrap_or("Unknown");
                    let response = ctx
                        .client
                        .get(&format!("/ValueSet/{id}/$expand"), &[])
                        .await?;
                    record_expansion(ctx, ledger, &response, label, name);
                }
            },
        }
    }

    let response = ctx
        .client
        .get("/ValueSet/$expand", &[("url", GENDER_VALUE_SET_URL)])
        .await?;
    record_expansion(
        ctx,
        ledger,
        &response,
        "$expand ValueSet by URL (administrative-gender)",
        "administrative-gender",
    );

    // Expand with a count limit; a compliant server never exceeds it.
    let label = "$expand ValueSet with count parameter";
    let response = ctx.client.get("/ValueSet", &[("_count", "1")]).await?;
    if response.status != StatusCode::OK {
        ledger.record_fail(label, format!("Search failed: {}", response.status));
    } else {
        match first_entry(&response, "ValueSet") {
            None => ledger.record_skip(label, "No ValueSet to expand"),
            Some(seed) => match str_field(&seed, "id") {
                None => ledger.record_skip(label, "No id in ValueSet"),
                Some(id) => {
                    let response = ctx
                        .client
                        .get(&format!("/ValueSet/{id}/$expand"), &[("count", "5")])
                        .await?;
                    match response.status {
                        StatusCode::OK => match expansion_size(&response) {
                            Some(count) if count <= 5 => {
                                ctx.note(format!("Expanded with count=5: {count} code(s)"));
                                ledger.record_pass(label);
                            }
                            Some(count) => {
                                ledger.record_fail(label, format!("Expected <=5 codes, got {count}"));
                            }
                            None => ledger.record_fail(label, "No expansion in response"),
                        },
                        StatusCode::UNPROCESSABLE_ENTITY => {
                            ledger.record_skip(label, "Server cannot expand this ValueSet (422)");
                        }
                        status => ledger.record_skip(label, format!("Status {status}")),
                    }
                }
            },
        }
    }

    let response = ctx
        .client
        .get(
            "/ValueSet/$expand",
            &[("url", GENDER_VALUE_SET_URL), ("filter", "male")],
        )
        .await?;
    record_expansion(
        ctx,
        ledger,
        &response,
        "$expand ValueSet with filter parameter",
        "with filter='male'",
    );

    Ok(())
}

async fn validate_code_operations(
    ctx: &mut SuiteContext<'_>,
    ledger: &mut Ledger,
) -> Result<(), Error> {
    ctx.section("$validate-code Operation Tests");

    let response = ctx
        .client
        .get(
            "/ValueSet/$validate-code",
            &[
                ("url", GENDER_VALUE_SET_URL),
                ("code", "male"),
                ("system", GENDER_SYSTEM_URL),
            ],
        )
        .await?;
    if record_boolean_result(ledger, &response, "$validate-code with valid code", true)
        == Verdict::Pass
    {
        ctx.note("Code 'male' is valid");
    }

    let response = ctx
        .client
        .get(
            "/ValueSet/$validate-code",
            &[
                ("url", GENDER_VALUE_SET_URL),
                ("code", "INVALID_CODE"),
                ("system", GENDER_SYSTEM_URL),
            ],
        )
        .await?;
    if record_boolean_result(ledger, &response, "$validate-code with invalid code", false)
        == Verdict::Pass
    {
        ctx.note("Code 'INVALID_CODE' correctly rejected");
    }

    let response = ctx
        .client
        .get(
            "/ValueSet/$validate-code",
            &[
                ("url", GENDER_VALUE_SET_URL),
                ("code", "male"),
                ("system", "http://wrong-system.example.com"),
            ],
        )
        .await?;
    if record_boolean_result(ledger, &response, "$validate-code with wrong system", false)
        == Verdict::Pass
    {
        ctx.note("Code with wrong system correctly rejected");
    }

    Ok(())
}

async fn lookup_operations(ctx: &mut SuiteContext<'_>, ledger: &mut Ledger) -> Result<(), Error> {
    ctx.section("$lookup Operation Tests");

    let label = "$lookup code in CodeSystem";
    let response = ctx
        .client
        .get(
            "/CodeSystem/$lookup",
            &[("system", GENDER_SYSTEM_URL), ("code", "male")],
        )
        .await?;
    if response.status == StatusCode::OK {
        let display_present = response
            .json()
            .and_then(|body| find_parameter(body, "display"))
            .is_some();
        if display_present {
            let display = response
                .json()
                .and_then(|body| string_parameter(body, "display"))
                .unwrap_or("Unknown");
            ctx.note(format!("Code 'male' display: {display}"));
            ledger.record_pass(label);
        } else {
            ledger.record_skip(label, "No display parameter in response");
        }
    } else {
        ledger.record_skip(label, format!("Status {}", response.status));
    }

    let response = ctx
        .client
        .get(
            "/CodeSystem/$lookup",
            &[("system", GENDER_SYSTEM_URL), ("code", "INVALID_CODE")],
        )
        .await?;
    if record_expected_error(
        ledger,
        &response,
        "$lookup non-existent code",
        &[StatusCode::NOT_FOUND, StatusCode::BAD_REQUEST],
    ) == Verdict::Pass
    {
        ctx.note("Non-existent code correctly rejected");
    }

    Ok(())
}

async fn concept_map_searches(
    ctx: &mut SuiteContext<'_>,
    ledger: &mut Ledger,
) -> Result<(), Error> {
    ctx.section("ConceptMap Tests");

    let response = ctx
        .client
        .get("/ConceptMap", &[("_summary", "true"), ("_count", "5")])
        .await?;
    let entries = record_bundle_search(
        ledger,
        &response,
        "ConceptMap",
        "Search for ConceptMaps",
        "No ConceptMaps found on server",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} ConceptMap(s)", entries.len()));
    }

    let response = ctx
        .client
        .get("/ConceptMap", &[("status", "active"), ("_count", "3")])
        .await?;
    let entries = record_bundle_search(
        ledger,
        &response,
        "ConceptMap",
        "Search ConceptMap by status=active",
        "No active ConceptMaps found",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        ctx.note(format!("Found {} active ConceptMap(s)", entries.len()));
    }

    // Read by id, if the server has any ConceptMap at all.
    let label = "Read ConceptMap by ID";
    let response = ctx.client.get("/ConceptMap", &[("_count", "1")]).await?;
    if response.status != StatusCode::OK {
        ledger.record_skip(label, format!("Search failed: {}", response.status));
    } else {
        match first_entry(&response, "ConceptMap") {
            None => ledger.record_skip(label, "No ConceptMaps to read"),
            Some(seed) => match str_field(&seed, "id") {
                None => ledger.record_skip(label, "No id in ConceptMap"),
                Some(id) => {
                    let response = ctx.client.get(&format!("/ConceptMap/{id}"), &[]).await?;
                    if response.status == StatusCode::OK {
                        let name = response
                            .json()
                            .and_then(|cm| str_field(cm, "name"))
                            .unwrap_or("Unknown");
                        ctx.note(format!("Read ConceptMap: {name}"));
                        ledger.record_pass(label);
                    } else {
                        ledger.record_fail(label, format!("Status {}", response.status));
                    }
                }
            },
        }
    }

    Ok(())
}

async fn version_management(ctx: &mut SuiteContext<'_>, ledger: &mut Ledger) -> Result<(), Error> {
    ctx.section("Version Management Tests");

    let response = ctx
        .client
        .get(
            "/CodeSystem",
            &[("url", V2_0203_URL), ("_sort", "-version"), ("_count", "3")],
        )
        .await?;
    let entries = record_bundle_search(
        ledger,
        &response,
        "CodeSystem",
        "Search CodeSystem with version sorting",
        "No CodeSystems found",
        OnHttpError::Skip,
    );
    if !entries.is_empty() {
        let versions: Vec<&str> = entries
            .iter()
            .map(|entry| str_field(entry, "version").unwrap_or("unknown"))
            .collect();
        ctx.note(format!("Found versions: {}", versions.join(", ")));
    }

    let response = ctx
        .client
        .get("/CodeSystem", &[("url", V2_0203_URL), ("version", "3.0.0")])
        .await?;
    let entries = record_bundle_search(
        ledger,
        &response,
        "CodeSystem",
        "Search CodeSystem by specific version",
        "Specific version not found",
        OnHttpError::Skip,
    );
    if let Some(first) = entries.first() {
        ctx.note(format!(
            "Found specific version: {}",
            str_field(first, "version").unwrap_or("unknown")
        ));
    }

    Ok(())
}

async fn error_scenarios(ctx: &mut SuiteContext<'_>, ledger: &mut Ledger) -> Result<(), Error> {
    ctx.section("Error Handling Tests");

    let response = ctx
        .client
        .get(
            "/ValueSet/$expand",
            &[("url", "http://example.com/ValueSet/nonexistent")],
        )
        .await?;
    if record_expected_error(
        ledger,
        &response,
        "Error: Expand non-existent ValueSet",
        &[StatusCode::NOT_FOUND, StatusCode::BAD_REQUEST],
    ) == Verdict::Pass
    {
        ctx.note("Non-existent ValueSet correctly returned error");
    }

    // 'code' and 'system' deliberately omitted.
    let response = ctx
        .client
        .get("/ValueSet/$validate-code", &[("url", GENDER_VALUE_SET_URL)])
        .await?;
    if record_expected_error(
        ledger,
        &response,
        "Error: Validate with missing parameters",
        &[StatusCode::BAD_REQUEST],
    ) == Verdict::Pass
    {
        ctx.note("Missing parameters correctly rejected");
    }

    let response = ctx
        .client
        .get(
            "/CodeSystem/$lookup",
            &[
                ("system", "http://invalid-system.example.com"),
                ("code", "test"),
            ],
        )
        .await?;
    if record_expected_error(
        ledger,
        &response,
        "Error: Lookup with invalid system",
        &[StatusCode::NOT_FOUND, StatusCode::BAD_REQUEST],
    ) == Verdict::Pass
    {
        ctx.note("Invalid system correctly rejected");
    }

    Ok(())
}

async fn additional_search_parameters(
    ctx: &mut SuiteContext<'_>,
    ledger: &mut Ledger,
) -> Result<(), Error> {
    ctx.section("Additional Search Parameter Tests");

    let parameter_searches: &[(&str, &str, &[(&str, &str)])] = &[
        (
            "CodeSystem",
            "Search CodeSystem by title",
            &[("title", "Identifier"), ("_count", "3")],
        ),
        (
            "CodeSystem",
            "Search CodeSystem by publisher",
            &[("publisher", "HL7"), ("_count", "3")],
        ),
        (
            "ValueSet",
            "Search ValueSet by name",
            &[("name", "administrative"), ("_count", "3")],
        ),
        (
            "ValueSet",
            "Search ValueSet by title",
            &[("title", "gender"), ("_count", "3")],
        ),
        (
            "ValueSet",
            "Search ValueSet by publisher",
            &[("publisher", "HL7"), ("_count", "3")],
        ),
        (
            "ConceptMap",
            "Search ConceptMap by name",
            &[("name", "map"), ("_count", "3")],
        ),
        (
            "ConceptMap",
            "Search ConceptMap by source-scope-uri",
            &[("source-scope-uri", "urn:iso:std:iso:3166"), ("_count", "3")],
        ),
        (
            "ConceptMap",
            "Search ConceptMap by target-scope-uri",
            &[("target-scope-uri", "urn:iso:std:iso:3166"), ("_count", "3")],
        ),
        (
            "ValueSet",
            "Combined search parameters (status + count)",
            &[("status", "active"), ("_count", "3")],
        ),
    ];

    for (resource_type, label, query) in parameter_searches {
        let path = format!("/{resource_type}");
        let response = ctx.client.get(&path, query).await?;
        let entries = record_bundle_search(
            ledger,
            &response,
            resource_type,
            label,
            "No results found",
            OnHttpError::Skip,
        );
        if !entries.is_empty() {
            ctx.note(format!("{label}: {} result(s)", entries.len()));
        }
    }

    // Pagination: with a page size of 2, a populated server links a next page.
    let label = "Pagination: Next link present";
    let response = ctx.client.get("/CodeSystem", &[("_count", "2")]).await?;
    if response.status == StatusCode::OK {
        match response.json().and_then(|bundle| link_url(bundle, "next")) {
            Some(_) => {
                ctx.note("Found next page link in pagination");
                ledger.record_pass(label);
            }
            None => ledger.record_skip(label, "No next link (maybe only one page)"),
        }
    } else {
        ledger.record_skip(label, format!("Status {}", response.status));
    }

    Ok(())
}
