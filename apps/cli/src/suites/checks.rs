//! Shared outcome-policy helpers.
//!
//! A response that merely lacks matchable data records a skip, not a
//! failure: the target server's dataset is not guaranteed to contain
//! fixtures for every test. Only a clear contract violation fails.

use probe_client::bundle::{boolean_parameter, extract_entries};
use probe_client::{ResponseSnapshot, StatusCode};
use probe_report::Ledger;
use serde_json::Value;

/// What a non-200 status means for the enclosing search test.
///
/// Primary searches treat it as a failure; searches against parameters the
/// server may not index treat it as a skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnHttpError {
    Fail,
    Skip,
}

/// How a recorded outcome landed, so callers can print progress notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
    Skip,
}

/// First matching entry of a search Bundle, cloned out of the response so
/// follow-up requests can outlive the snapshot.
pub fn first_entry(snapshot: &ResponseSnapshot, resource_type: &str) -> Option<Value> {
    snapshot.json().and_then(|bundle| {
        extract_entries(bundle, resource_type)
            .first()
            .map(|&entry| entry.clone())
    })
}

/// Record the outcome of a Bundle search and hand back any matching entries
/// for follow-up requests.
///
/// 200 with at least one matching entry passes; 200 with none skips with
/// `empty_reason`; any other status fails or skips per `on_error`.
pub fn record_bundle_search(
    ledger: &mut Ledger,
    snapshot: &ResponseSnapshot,
    resource_type: &str,
    label: &str,
    empty_reason: &str,
    on_error: OnHttpError,
) -> Vec<Value> {
    if snapshot.status != StatusCode::OK {
        let reason = format!("Status {}", snapshot.status);
        match on_error {
            OnHttpError::Fail => ledger.record_fail(label, reason),
            OnHttpError::Skip => ledger.record_skip(label, reason),
        }
        return Vec::new();
    }

    let entries: Vec<Value> = snapshot
        .json()
        .map(|bundle| {
            extract_entries(bundle, resource_type)
                .into_iter()
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    if entries.is_empty() {
        ledger.record_skip(label, empty_reason);
    } else {
        ledger.record_pass(label);
    }
    entries
}

/// Record the outcome of a designed-to-fail scenario.
///
/// A status in `rejecting_statuses` OR a 200 whose body is an
/// OperationOutcome both count as the server correctly rejecting the
/// request; a 200 with a normal success body is a contract violation.
pub fn record_expected_error(
    ledger: &mut Ledger,
    snapshot: &ResponseSnapshot,
    label: &str,
    rejecting_statuses: &[StatusCode],
) -> Verdict {
    if rejecting_statuses.contains(&snapshot.status) {
        ledger.record_pass(label);
        return Verdict::Pass;
    }

    if snapshot.status == StatusCode::OK {
        if snapshot.is_operation_outcome() {
            ledger.record_pass(label);
            Verdict::Pass
        } else {
            ledger.record_fail(label, "Expected error, got successful response");
            Verdict::Fail
        }
    } else {
        ledger.record_skip(label, format!("Status {}", snapshot.status));
        Verdict::Skip
    }
}

/// Record the outcome of a $validate-code style assertion on the boolean
/// `result` parameter.
///
/// A missing parameter counts as a failure, the same as a wrong value; a
/// non-200 status is a skip because the operation may be unsupported.
pub fn record_boolean_result(
    ledger: &mut Ledger,
    snapshot: &ResponseSnapshot,
    label: &str,
    expected: bool,
) -> Verdict {
    if snapshot.status != StatusCode::OK {
        ledger.record_skip(label, format!("Status {}", snapshot.status));
        return Verdict::Skip;
    }

    match snapshot.json().and_then(|body| boolean_parameter(body, "result")) {
        Some(value) if value == expected => {
            ledger.record_pass(label);
            Verdict::Pass
        }
        _ => {
            ledger.record_fail(label, format!("Expected result={expected}"));
            Verdict::Fail
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_client::Body;
    use serde_json::json;

    fn snapshot(status: u16, body: Value) -> ResponseSnapshot {
        ResponseSnapshot {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: Body::Json(body),
        }
    }

    fn gender_bundle() -> Value {
        json!({
            "resourceType": "Bundle",
            "entry": [
                { "resource": { "resourceType": "ValueSet", "id": "administrative-gender" } }
            ]
        })
    }

    fn validation_result(result: bool) -> Value {
        json!({
            "resourceType": "Parameters",
            "parameter": [ { "name": "result", "valueBoolean": result } ]
        })
    }

    #[test]
    fn search_with_matching_entries_passes() {
        let mut ledger = Ledger::new();
        let entries = record_bundle_search(
            &mut ledger,
            &snapshot(200, gender_bundle()),
            "ValueSet",
            "Search ValueSet by URL",
            "Specific ValueSet not found",
            OnHttpError::Fail,
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(ledger.passed(), 1);
    }

    #[test]
    fn empty_search_skips_rather_than_fails() {
        let mut ledger = Ledger::new();
        let entries = record_bundle_search(
            &mut ledger,
            &snapshot(200, json!({"resourceType": "Bundle"})),
            "ConceptMap",
            "Search ConceptMaps",
            "No ConceptMaps found on server",
            OnHttpError::Fail,
        );
        assert!(entries.is_empty());
        assert_eq!(ledger.skipped(), 1);
        assert_eq!(ledger.failed(), 0);
    }

    #[test]
    fn http_error_policy_is_honored() {
        let mut ledger = Ledger::new();
        record_bundle_search(
            &mut ledger,
            &snapshot(500, json!({})),
            "CodeSystem",
            "Search all CodeSystems",
            "No CodeSystems found",
            OnHttpError::Fail,
        );
        record_bundle_search(
            &mut ledger,
            &snapshot(500, json!({})),
            "CodeSystem",
            "Search CodeSystem by title",
            "No CodeSystems found",
            OnHttpError::Skip,
        );
        assert_eq!(ledger.failed(), 1);
        assert_eq!(ledger.skipped(), 1);
    }

    #[test]
    fn valid_code_with_true_result_passes() {
        let mut ledger = Ledger::new();
        let verdict = record_boolean_result(
            &mut ledger,
            &snapshot(200, validation_result(true)),
            "$validate-code with valid code",
            true,
        );
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(ledger.passed(), 1);
    }

    #[test]
    fn invalid_code_with_false_result_passes_and_true_fails() {
        let mut ledger = Ledger::new();
        let rejected = record_boolean_result(
            &mut ledger,
            &snapshot(200, validation_result(false)),
            "$validate-code with invalid code",
            false,
        );
        assert_eq!(rejected, Verdict::Pass);

        let accepted = record_boolean_result(
            &mut ledger,
            &snapshot(200, validation_result(true)),
            "$validate-code with invalid code",
            false,
        );
        assert_eq!(accepted, Verdict::Fail);
        assert_eq!(ledger.passed(), 1);
        assert_eq!(ledger.failed(), 1);
    }

    #[test]
    fn missing_result_parameter_fails() {
        let mut ledger = Ledger::new();
        let verdict = record_boolean_result(
            &mut ledger,
            &snapshot(200, json!({"resourceType": "Parameters", "parameter": []})),
            "$validate-code with valid code",
            true,
        );
        assert_eq!(verdict, Verdict::Fail);
    }

    #[test]
    fn non_200_validation_is_a_skip() {
        let mut ledger = Ledger::new();
        let verdict = record_boolean_result(
            &mut ledger,
            &snapshot(501, json!({})),
            "$validate-code with valid code",
            true,
        );
        assert_eq!(verdict, Verdict::Skip);
        assert!(ledger.summary().overall_success);
    }

    #[test]
    fn lookup_of_unknown_code_passes_on_4xx() {
        let mut ledger = Ledger::new();
        let verdict = record_expected_error(
            &mut ledger,
            &snapshot(404, json!({})),
            "$lookup non-existent code",
            &[StatusCode::NOT_FOUND, StatusCode::BAD_REQUEST],
        );
        assert_eq!(verdict, Verdict::Pass);
    }

    #[test]
    fn lookup_of_unknown_code_passes_on_operation_outcome() {
        let mut ledger = Ledger::new();
        let verdict = record_expected_error(
            &mut ledger,
            &snapshot(200, json!({"resourceType": "OperationOutcome", "issue": []})),
            "$lookup non-existent code",
            &[StatusCode::NOT_FOUND, StatusCode::BAD_REQUEST],
        );
        assert_eq!(verdict, Verdict::Pass);
    }

    #[test]
    fn lookup_of_unknown_code_fails_on_normal_success_body() {
        let mut ledger = Ledger::new();
        let verdict = record_expected_error(
            &mut ledger,
            &snapshot(200, validation_result(true)),
            "$lookup non-existent code",
            &[StatusCode::NOT_FOUND, StatusCode::BAD_REQUEST],
        );
        assert_eq!(verdict, Verdict::Fail);
        assert_eq!(ledger.failed(), 1);
    }

    #[test]
    fn unexpected_status_in_error_scenario_is_a_skip() {
        let mut ledger = Ledger::new();
        let verdict = record_expected_error(
            &mut ledger,
            &snapshot(503, json!({})),
            "$lookup non-existent code",
            &[StatusCode::NOT_FOUND, StatusCode::BAD_REQUEST],
        );
        assert_eq!(verdict, Verdict::Skip);
    }
}
