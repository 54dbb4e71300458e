//! Inspection helpers for Bundle and Parameters resources.
//!
//! Everything here works on generic `serde_json::Value` bodies and returns
//! an explicit `Option`/empty `Vec` when a field is absent. Only the current
//! page of a Bundle is considered; pagination links are never followed.

use serde_json::Value;

/// Entries of a search Bundle whose wrapped resource matches
/// `resource_type`, in Bundle order.
///
/// Returns an empty sequence when the Bundle has no `entry` array.
pub fn extract_entries<'a>(bundle: &'a Value, resource_type: &str) -> Vec<&'a Value> {
    let Some(entries) = bundle.get("entry").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| entry.get("resource"))
        .filter(|resource| str_field(resource, "resourceType") == Some(resource_type))
        .collect()
}

/// A string field of a JSON object, or `None` when absent or not a string.
pub fn str_field<'a>(value: &'a Value, name: &str) -> Option<&'a str> {
    value.get(name).and_then(Value::as_str)
}

/// The named entry of a FHIR `Parameters` resource.
pub fn find_parameter<'a>(parameters: &'a Value, name: &str) -> Option<&'a Value> {
    parameters
        .get("parameter")?
        .as_array()?
        .iter()
        .find(|parameter| str_field(parameter, "name") == Some(name))
}

/// The `valueBoolean` of a named `Parameters` entry.
pub fn boolean_parameter(parameters: &Value, name: &str) -> Option<bool> {
    find_parameter(parameters, name)?
        .get("valueBoolean")?
        .as_bool()
}

/// The `valueString` of a named `Parameters` entry.
pub fn string_parameter<'a>(parameters: &'a Value, name: &str) -> Option<&'a str> {
    find_parameter(parameters, name)?
        .get("valueString")?
        .as_str()
}

/// URL of a Bundle link with the given relation (e.g. `next`).
pub fn link_url<'a>(bundle: &'a Value, relation: &str) -> Option<&'a str> {
    bundle
        .get("link")?
        .as_array()?
        .iter()
        .find(|link| str_field(link, "relation") == Some(relation))
        .and_then(|link| str_field(link, "url"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_matching_entries_in_order() {
        let bundle = json!({
            "resourceType": "Bundle",
            "entry": [
                { "resource": { "resourceType": "ValueSet", "id": "vs-1" } },
                { "resource": { "resourceType": "CodeSystem", "id": "cs-1" } },
                { "resource": { "resourceType": "ValueSet", "id": "vs-2" } }
            ]
        });

        let entries = extract_entries(&bundle, "ValueSet");
        assert_eq!(entries.len(), 2);
        assert_eq!(str_field(entries[0], "id"), Some("vs-1"));
        assert_eq!(str_field(entries[1], "id"), Some("vs-2"));
    }

    #[test]
    fn missing_entry_field_yields_empty_sequence() {
        let bundle = json!({ "resourceType": "Bundle", "total": 0 });
        assert!(extract_entries(&bundle, "ValueSet").is_empty());
    }

    #[test]
    fn entries_without_resource_are_ignored() {
        let bundle = json!({
            "resourceType": "Bundle",
            "entry": [
                { "fullUrl": "urn:uuid:123" },
                { "resource": { "resourceType": "Patient", "id": "p1" } }
            ]
        });
        assert_eq!(extract_entries(&bundle, "Patient").len(), 1);
    }

    #[test]
    fn finds_boolean_result_parameter() {
        let parameters = json!({
            "resourceType": "Parameters",
            "parameter": [
                { "name": "display", "valueString": "Male" },
                { "name": "result", "valueBoolean": true }
            ]
        });

        assert_eq!(boolean_parameter(&parameters, "result"), Some(true));
        assert_eq!(string_parameter(&parameters, "display"), Some("Male"));
        assert_eq!(boolean_parameter(&parameters, "missing"), None);
    }

    #[test]
    fn finds_next_link_by_relation() {
        let bundle = json!({
            "resourceType": "Bundle",
            "link": [
                { "relation": "self", "url": "https://example.org/fhir/CodeSystem?_count=2" },
                { "relation": "next", "url": "https://example.org/fhir/CodeSystem?_count=2&page=2" }
            ]
        });

        assert_eq!(
            link_url(&bundle, "next"),
            Some("https://example.org/fhir/CodeSystem?_count=2&page=2")
        );
        assert_eq!(link_url(&bundle, "previous"), None);
    }
}
