//! Typed JSON extraction and validation for model responses
//!
//! Model output arrives as free text that should contain one JSON object,
//! often wrapped in a markdown fence. [`decode`] extracts that object and
//! deserializes it into the stage's declared schema type, distinguishing
//! "not JSON at all" ([`DomainError::ResponseParse`]) from "JSON that does
//! not match the schema" ([`DomainError::SchemaValidation`]). The raw
//! payload is retained on both errors and never silently coerced.

use crate::core::error::DomainError;
use serde::de::DeserializeOwned;

/// Extract the JSON object embedded in a model response.
///
/// Prefers a fenced ```json block; otherwise scans from the first `{` to
/// the last `}`.
pub fn extract_json(text: &str) -> Result<&str, DomainError> {
    if let Some(start) = text.find("```json") {
        let body = &text[start + "```json".len()..];
        if let Some(end) = body.find("```") {
            return Ok(body[..end].trim());
        }
    }

    if let Some(start) = text.find('{')
        && let Some(end) = text[start..].rfind('}')
    {
        return Ok(&text[start..start + end + 1]);
    }

    Err(DomainError::ResponseParse {
        detail: "no JSON object found in response".to_string(),
        raw: text.to_string(),
    })
}

/// Decode a model response into the declared schema type `T`
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, DomainError> {
    let json = extract_json(text)?;

    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| DomainError::ResponseParse {
            detail: e.to_string(),
            raw: json.to_string(),
        })?;

    serde_json::from_value(value).map_err(|e| DomainError::SchemaValidation {
        detail: e.to_string(),
        raw: json.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        score: f64,
        notes: Vec<String>,
    }

    #[test]
    fn test_decode_plain_json() {
        let sample: Sample = decode(r#"{"score": 80, "notes": ["a"]}"#).unwrap();
        assert_eq!(sample.score, 80.0);
        assert_eq!(sample.notes, vec!["a"]);
    }

    #[test]
    fn test_decode_fenced_json() {
        let text = "Here you go:\n```json\n{\"score\": 70, \"notes\": []}\n```\nDone.";
        let sample: Sample = decode(text).unwrap();
        assert_eq!(sample.score, 70.0);
    }

    #[test]
    fn test_decode_json_with_surrounding_prose() {
        let text = "Assessment follows. {\"score\": 60, \"notes\": []} Thanks!";
        let sample: Sample = decode(text).unwrap();
        assert_eq!(sample.score, 60.0);
    }

    #[test]
    fn test_non_json_is_parse_error_with_raw() {
        let err = decode::<Sample>("I cannot answer that.").unwrap_err();
        match err {
            DomainError::ResponseParse { raw, .. } => {
                assert_eq!(raw, "I cannot answer that.");
            }
            other => panic!("expected ResponseParse, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_body_is_parse_error() {
        let err = decode::<Sample>("{\"score\": }").unwrap_err();
        assert!(matches!(err, DomainError::ResponseParse { .. }));
    }

    #[test]
    fn test_wrong_field_type_is_schema_error() {
        let err = decode::<Sample>(r#"{"score": "high", "notes": []}"#).unwrap_err();
        match err {
            DomainError::SchemaValidation { raw, .. } => {
                assert!(raw.contains("high"));
            }
            other => panic!("expected SchemaValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let err = decode::<Sample>(r#"{"score": 50}"#).unwrap_err();
        assert!(matches!(err, DomainError::SchemaValidation { .. }));
    }
}
