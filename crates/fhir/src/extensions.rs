//! Extension lookup over FHIR resource extension arrays.
//!
//! Supplementary coded attributes (ethnicity, among others) travel in the
//! resource's `extension` array as `{url, valueString | extension[]}` nodes,
//! sometimes nested one level deep. This module provides a small typed lookup
//! over that shape, returning optional strings so callers can apply their own
//! fallbacks.

use serde_json::Value;

/// Extension URL carrying the patient's ethnicity.
pub const ETHNICITY_EXTENSION_URL: &str =
    "http://hl7.org/fhir/us/core/StructureDefinition/us-core-ethnicity";

/// Sub-extension URL carrying the human-readable text of a coded extension.
pub const EXTENSION_TEXT_URL: &str = "text";

/// Find the extension node whose `url` matches, in document order.
pub fn find<'a>(extensions: &'a [Value], url: &str) -> Option<&'a Value> {
    extensions.iter().find(|ext| ext["url"].as_str() == Some(url))
}

/// Read the `valueString` of the extension whose `url` matches.
pub fn value_string<'a>(extensions: &'a [Value], url: &str) -> Option<&'a str> {
    find(extensions, url)?["valueString"].as_str()
}

/// Two-level lookup: find the outer extension by `outer_url`, then read the
/// `valueString` of its sub-extension matching `inner_url`.
pub fn nested_value_string<'a>(
    extensions: &'a [Value],
    outer_url: &str,
    inner_url: &str,
) -> Option<&'a str> {
    let outer = find(extensions, outer_url)?;
    let inner = outer["extension"].as_array()?;
    value_string(inner, inner_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ethnicity_extensions() -> Vec<Value> {
        vec![
            json!({
                "url": "http://example.org/unrelated",
                "valueString": "ignored"
            }),
            json!({
                "url": ETHNICITY_EXTENSION_URL,
                "extension": [
                    {
                        "url": "ombCategory",
                        "valueCoding": {"code": "2186-5"}
                    },
                    {
                        "url": "text",
                        "valueString": "Not Hispanic or Latino"
                    }
                ]
            }),
        ]
    }

    #[test]
    fn finds_nested_text_value() {
        let exts = ethnicity_extensions();
        assert_eq!(
            nested_value_string(&exts, ETHNICITY_EXTENSION_URL, EXTENSION_TEXT_URL),
            Some("Not Hispanic or Latino")
        );
    }

    #[test]
    fn missing_outer_url_yields_none() {
        let exts = ethnicity_extensions();
        assert_eq!(
            nested_value_string(&exts, "http://example.org/absent", EXTENSION_TEXT_URL),
            None
        );
    }

    #[test]
    fn missing_inner_url_yields_none() {
        let exts = vec![json!({
            "url": ETHNICITY_EXTENSION_URL,
            "extension": [{"url": "ombCategory", "valueCoding": {}}]
        })];
        assert_eq!(
            nested_value_string(&exts, ETHNICITY_EXTENSION_URL, EXTENSION_TEXT_URL),
            None
        );
    }

    #[test]
    fn outer_without_sub_extensions_yields_none() {
        let exts = vec![json!({"url": ETHNICITY_EXTENSION_URL, "valueString": "flat"})];
        assert_eq!(
            nested_value_string(&exts, ETHNICITY_EXTENSION_URL, EXTENSION_TEXT_URL),
            None
        );
        // The flat value is still reachable with the single-level lookup.
        assert_eq!(value_string(&exts, ETHNICITY_EXTENSION_URL), Some("flat"));
    }
}
