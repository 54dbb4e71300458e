//! Uniform view of a single FHIR response.

use reqwest::StatusCode;
use serde_json::Value;

use crate::bundle::str_field;

/// Status code plus decoded body, held just long enough for the issuing
/// test to inspect it.
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    pub status: StatusCode,
    pub body: Body,
}

/// Response body: parsed JSON when the content type indicated JSON,
/// raw text otherwise.
#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl ResponseSnapshot {
    /// The body as JSON, if it decoded as such.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            Body::Json(value) => Some(value),
            Body::Text(_) => None,
        }
    }

    /// The `resourceType` of a JSON body.
    pub fn resource_type(&self) -> Option<&str> {
        self.json().and_then(|value| str_field(value, "resourceType"))
    }

    /// Whether the body is a FHIR error report rather than a normal result.
    pub fn is_operation_outcome(&self) -> bool {
        self.resource_type() == Some("OperationOutcome")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recognizes_operation_outcome_bodies() {
        let snapshot = ResponseSnapshot {
            status: StatusCode::OK,
            body: Body::Json(json!({"resourceType": "OperationOutcome", "issue": []})),
        };
        assert!(snapshot.is_operation_outcome());

        let bundle = ResponseSnapshot {
            status: StatusCode::OK,
            body: Body::Json(json!({"resourceType": "Bundle"})),
        };
        assert!(!bundle.is_operation_outcome());
    }

    #[test]
    fn text_bodies_expose_no_json() {
        let snapshot = ResponseSnapshot {
            status: StatusCode::NOT_FOUND,
            body: Body::Text("not found".to_string()),
        };
        assert!(snapshot.json().is_none());
        assert!(!snapshot.is_operation_outcome());
    }
}
