//! Patient resource flattening and edit merge-back.
//!
//! This module translates between the remote API's nested patient resource and
//! the flattened view the dashboard displays and edits.
//!
//! Responsibilities:
//! - Flatten a raw resource into [`PatientView`], applying a defined fallback
//!   for every absent field; absence never propagates as null
//! - Merge [`PatientEdits`] back onto a copy of the raw resource, preserving
//!   every field the edit form does not cover
//!
//! Notes:
//! - The raw resource is owned by the remote system; this module only reads
//!   and partially rewrites it
//! - Losing unedited fields on write-back is a data-loss bug the remote system
//!   would persist, so the merge operates on the full raw document

use crate::extensions::{self, ETHNICITY_EXTENSION_URL, EXTENSION_TEXT_URL};
use crate::{FhirError, FhirResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Fallback for absent textual demographics.
const FALLBACK_UNKNOWN: &str = "Unknown";

/// Fallback for absent identifier-like fields.
const FALLBACK_NA: &str = "N/A";

/// Fallback when no ethnicity extension is present.
const FALLBACK_ETHNICITY: &str = "Unspecified";

// ============================================================================
// Public domain-level types
// ============================================================================

/// Primary human name, flattened from the resource's first `name` entry.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PatientName {
    /// Family name (surname), or `"Unknown"`.
    pub family: String,

    /// Given names (first name, middle names). Empty when absent.
    pub given: Vec<String>,

    /// Display form assembled from the given and family names actually
    /// present, or `"Unknown"` when the resource carries no name at all.
    pub full: String,
}

/// Telecom entry (phone, email) in the shape the remote API uses.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ContactPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

/// Display-oriented projection of a patient resource.
///
/// Derived fresh on every read; never cached beyond a single request cycle.
/// Every field holds its documented fallback when the source field is absent.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientView {
    pub id: String,

    /// Value of the first identifier (first-is-primary convention), or `"N/A"`.
    pub identifier: String,

    pub name: PatientName,
    pub gender: String,
    pub birth_date: String,
    pub active: bool,
    pub deceased: bool,
    pub marital_status: String,
    pub last_updated: String,
    pub telecom: Vec<ContactPoint>,

    /// Address entries passed through verbatim for display.
    pub address: Vec<Value>,

    pub ethnicity: String,
}

/// Fields the edit form can change.
///
/// Every field is optional: only provided fields touch the raw resource on
/// merge-back.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientEdits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Human-readable marital status. Merged into `maritalStatus.text`,
    /// leaving any existing coding in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telecom: Option<Vec<ContactPoint>>,
}

// ============================================================================
// Public Patient operations
// ============================================================================

/// Patient resource operations.
///
/// This is a zero-sized type used for namespacing patient-related operations.
/// All methods are associated functions.
pub struct Patient;

impl Patient {
    /// Flatten a raw patient resource into the display projection.
    ///
    /// Never fails: any field absent from (or malformed in) the raw resource
    /// resolves to its documented fallback instead.
    pub fn flatten(raw: &Value) -> PatientView {
        PatientView {
            id: raw["id"]
                .as_str()
                .unwrap_or(FALLBACK_UNKNOWN)
                .to_string(),
            identifier: raw["identifier"][0]["value"]
                .as_str()
                .unwrap_or(FALLBACK_NA)
                .to_string(),
            name: flatten_name(raw),
            gender: raw["gender"]
                .as_str()
                .unwrap_or(FALLBACK_UNKNOWN)
                .to_string(),
            birth_date: raw["birthDate"]
                .as_str()
                .unwrap_or(FALLBACK_NA)
                .to_string(),
            active: raw["active"].as_bool().unwrap_or(false),
            deceased: raw["deceasedBoolean"]
                .as_bool()
                .unwrap_or_else(|| raw["deceasedDateTime"].is_string()),
            marital_status: raw["maritalStatus"]["text"]
                .as_str()
                .or_else(|| raw["maritalStatus"]["coding"][0]["display"].as_str())
                .unwrap_or(FALLBACK_UNKNOWN)
                .to_string(),
            last_updated: raw["meta"]["lastUpdated"]
                .as_str()
                .unwrap_or(FALLBACK_NA)
                .to_string(),
            telecom: raw["telecom"]
                .as_array()
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                        .collect()
                })
                .unwrap_or_default(),
            address: raw["address"].as_array().cloned().unwrap_or_default(),
            ethnicity: raw["extension"]
                .as_array()
                .and_then(|exts| {
                    extensions::nested_value_string(exts, ETHNICITY_EXTENSION_URL, EXTENSION_TEXT_URL)
                })
                .unwrap_or(FALLBACK_ETHNICITY)
                .to_string(),
        }
    }

    /// Merge edited fields onto a copy of `raw`.
    ///
    /// Only the keys an edit actually provides are touched; identifiers,
    /// addresses, extensions, and anything else this crate does not model pass
    /// through untouched. Name edits rewrite the primary `name` entry while
    /// keeping its other keys and any further name entries; a marital-status
    /// edit updates `maritalStatus.text` without discarding the coding.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidInput`] if `raw` is not a JSON object.
    pub fn merge_edits(raw: &Value, edits: &PatientEdits) -> FhirResult<Value> {
        let mut updated = raw.clone();
        let obj = updated.as_object_mut().ok_or_else(|| {
            FhirError::InvalidInput("patient resource must be a JSON object".into())
        })?;

        if edits.family.is_some() || edits.given.is_some() {
            let mut entries = match obj.get("name") {
                Some(Value::Array(existing)) => existing.clone(),
                _ => Vec::new(),
            };
            let mut primary = match entries.first() {
                Some(Value::Object(existing)) => existing.clone(),
                _ => Map::new(),
            };
            primary.entry("use").or_insert_with(|| json!("official"));
            if let Some(family) = &edits.family {
                primary.insert("family".into(), json!(family));
            }
            if let Some(given) = &edits.given {
                primary.insert("given".into(), json!(given));
            }
            if entries.is_empty() {
                entries.push(Value::Object(primary));
            } else {
                entries[0] = Value::Object(primary);
            }
            obj.insert("name".into(), Value::Array(entries));
        }

        if let Some(gender) = &edits.gender {
            obj.insert("gender".into(), json!(gender));
        }
        if let Some(birth_date) = &edits.birth_date {
            obj.insert("birthDate".into(), json!(birth_date));
        }
        if let Some(active) = edits.active {
            obj.insert("active".into(), json!(active));
        }

        if let Some(text) = &edits.marital_status {
            let mut marital = match obj.get("maritalStatus") {
                Some(Value::Object(existing)) => existing.clone(),
                _ => Map::new(),
            };
            marital.insert("text".into(), json!(text));
            obj.insert("maritalStatus".into(), Value::Object(marital));
        }

        if let Some(telecom) = &edits.telecom {
            let wire = serde_json::to_value(telecom).map_err(|e| {
                FhirError::Translation(format!("failed to serialise telecom edits: {e}"))
            })?;
            obj.insert("telecom".into(), wire);
        }

        Ok(updated)
    }
}

fn flatten_name(raw: &Value) -> PatientName {
    let entry = &raw["name"][0];
    let family = entry["family"].as_str();
    let given: Vec<String> = entry["given"]
        .as_array()
        .map(|names| {
            names
                .iter()
                .filter_map(|g| g.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let mut parts = given.clone();
    if let Some(family) = family {
        parts.push(family.to_string());
    }
    let full = if parts.is_empty() {
        FALLBACK_UNKNOWN.to_string()
    } else {
        parts.join(" ")
    };

    PatientName {
        family: family.unwrap_or(FALLBACK_UNKNOWN).to_string(),
        given,
        full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_resource() -> Value {
        json!({
            "resourceType": "Patient",
            "id": "42",
            "identifier": [
                {"system": "http://hospital.example.org/mrn", "value": "MRN-001"},
                {"system": "http://hospital.example.org/alt", "value": "ALT-9"}
            ],
            "name": [
                {"use": "official", "family": "Williams", "given": ["Sarah", "Jane"]},
                {"use": "nickname", "given": ["Sally"]}
            ],
            "gender": "female",
            "birthDate": "1992-03-20",
            "active": true,
            "deceasedBoolean": false,
            "maritalStatus": {
                "coding": [{"system": "http://terminology.hl7.org/CodeSystem/v3-MaritalStatus", "code": "M", "display": "Married"}],
                "text": "Married"
            },
            "telecom": [
                {"system": "phone", "value": "555-0100", "use": "home", "rank": 1}
            ],
            "address": [
                {"line": ["12 Harbour St"], "city": "Leeds", "postalCode": "LS1 4AB"}
            ],
            "extension": [
                {
                    "url": "http://hl7.org/fhir/us/core/StructureDefinition/us-core-ethnicity",
                    "extension": [
                        {"url": "text", "valueString": "Not Hispanic or Latino"}
                    ]
                }
            ],
            "meta": {"lastUpdated": "2026-01-23T13:58:04.099304Z", "versionId": "7"}
        })
    }

    #[test]
    fn flattens_complete_resource() {
        let view = Patient::flatten(&full_resource());
        assert_eq!(view.id, "42");
        assert_eq!(view.identifier, "MRN-001");
        assert_eq!(view.name.family, "Williams");
        assert_eq!(view.name.given, vec!["Sarah", "Jane"]);
        assert_eq!(view.name.full, "Sarah Jane Williams");
        assert_eq!(view.gender, "female");
        assert_eq!(view.birth_date, "1992-03-20");
        assert!(view.active);
        assert!(!view.deceased);
        assert_eq!(view.marital_status, "Married");
        assert_eq!(view.last_updated, "2026-01-23T13:58:04.099304Z");
        assert_eq!(view.telecom.len(), 1);
        assert_eq!(view.telecom[0].value.as_deref(), Some("555-0100"));
        assert_eq!(view.address.len(), 1);
        assert_eq!(view.ethnicity, "Not Hispanic or Latino");
    }

    #[test]
    fn fallbacks_cover_every_field_of_an_empty_resource() {
        let view = Patient::flatten(&json!({}));
        assert_eq!(view.id, "Unknown");
        assert_eq!(view.identifier, "N/A");
        assert_eq!(view.name.family, "Unknown");
        assert!(view.name.given.is_empty());
        assert_eq!(view.name.full, "Unknown");
        assert_eq!(view.gender, "Unknown");
        assert_eq!(view.birth_date, "N/A");
        assert!(!view.active);
        assert!(!view.deceased);
        assert_eq!(view.marital_status, "Unknown");
        assert_eq!(view.last_updated, "N/A");
        assert!(view.telecom.is_empty());
        assert!(view.address.is_empty());
        assert_eq!(view.ethnicity, "Unspecified");
    }

    #[test]
    fn given_without_family_still_produces_a_full_name() {
        let view = Patient::flatten(&json!({
            "name": [{"given": ["Sally"]}]
        }));
        assert_eq!(view.name.family, "Unknown");
        assert_eq!(view.name.full, "Sally");
    }

    #[test]
    fn deceased_datetime_counts_as_deceased() {
        let view = Patient::flatten(&json!({"deceasedDateTime": "2024-01-01T00:00:00Z"}));
        assert!(view.deceased);
    }

    #[test]
    fn marital_status_falls_back_to_coding_display() {
        let view = Patient::flatten(&json!({
            "maritalStatus": {"coding": [{"code": "S", "display": "Never Married"}]}
        }));
        assert_eq!(view.marital_status, "Never Married");
    }

    #[test]
    fn merge_preserves_fields_the_edit_does_not_cover() {
        let raw = full_resource();
        let edits = PatientEdits {
            family: Some("Watson".into()),
            gender: Some("female".into()),
            ..Default::default()
        };

        let merged = Patient::merge_edits(&raw, &edits).expect("merge");

        // Untouched fields are byte-for-byte identical.
        assert_eq!(merged["identifier"], raw["identifier"]);
        assert_eq!(merged["address"], raw["address"]);
        assert_eq!(merged["extension"], raw["extension"]);
        assert_eq!(merged["meta"], raw["meta"]);
        assert_eq!(merged["telecom"], raw["telecom"]);
        // Secondary name entries survive a primary-name edit.
        assert_eq!(merged["name"][1], raw["name"][1]);
        // The primary entry keeps keys the edit did not set.
        assert_eq!(merged["name"][0]["use"], json!("official"));
        assert_eq!(merged["name"][0]["given"], raw["name"][0]["given"]);
        assert_eq!(merged["name"][0]["family"], json!("Watson"));
    }

    #[test]
    fn edited_values_reextract_through_flatten() {
        let raw = full_resource();
        let edits = PatientEdits {
            family: Some("Watson".into()),
            given: Some(vec!["Mary".into()]),
            birth_date: Some("1990-07-01".into()),
            active: Some(false),
            marital_status: Some("Divorced".into()),
            telecom: Some(vec![ContactPoint {
                system: Some("email".into()),
                value: Some("mary@example.org".into()),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let merged = Patient::merge_edits(&raw, &edits).expect("merge");
        let view = Patient::flatten(&merged);

        assert_eq!(view.name.family, "Watson");
        assert_eq!(view.name.given, vec!["Mary"]);
        assert_eq!(view.birth_date, "1990-07-01");
        assert!(!view.active);
        assert_eq!(view.marital_status, "Divorced");
        assert_eq!(view.telecom[0].value.as_deref(), Some("mary@example.org"));
    }

    #[test]
    fn marital_status_edit_keeps_existing_coding() {
        let raw = full_resource();
        let edits = PatientEdits {
            marital_status: Some("Divorced".into()),
            ..Default::default()
        };

        let merged = Patient::merge_edits(&raw, &edits).expect("merge");
        assert_eq!(merged["maritalStatus"]["text"], json!("Divorced"));
        assert_eq!(merged["maritalStatus"]["coding"], raw["maritalStatus"]["coding"]);
    }

    #[test]
    fn name_edit_on_nameless_resource_creates_official_entry() {
        let merged = Patient::merge_edits(
            &json!({"id": "7"}),
            &PatientEdits {
                family: Some("Doe".into()),
                given: Some(vec!["Jan".into()]),
                ..Default::default()
            },
        )
        .expect("merge");

        assert_eq!(merged["name"][0]["use"], json!("official"));
        assert_eq!(merged["name"][0]["family"], json!("Doe"));
        assert_eq!(merged["name"][0]["given"], json!(["Jan"]));
    }

    #[test]
    fn empty_edits_leave_the_resource_identical() {
        let raw = full_resource();
        let merged = Patient::merge_edits(&raw, &PatientEdits::default()).expect("merge");
        assert_eq!(merged, raw);
    }

    #[test]
    fn merge_rejects_non_object_resource() {
        let err = Patient::merge_edits(&json!([1, 2]), &PatientEdits::default())
            .expect_err("should reject array");
        assert!(matches!(err, FhirError::InvalidInput(_)));
    }
}
