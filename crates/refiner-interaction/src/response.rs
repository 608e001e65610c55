//! Parsing of backend text into gateway responses.
//!
//! Models frequently wrap JSON in code fences or surround it with prose, so
//! the first JSON object found in the text is used.

use refiner_core::analysis::RawAnalysis;
use refiner_core::error::{RefinerError, Result};
use refiner_core::warning::{Generated, ShapeCoercion};
use serde_json::Value;

/// Removes one surrounding Markdown code fence, if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. ```json).
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => return trimmed,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Finds the first JSON object in `text`.
pub fn extract_json_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    let candidate = strip_code_fence(text);
    if let Ok(Value::Object(map)) = serde_json::from_str(candidate) {
        return Some(map);
    }

    let start = candidate.find('{')?;
    let end = candidate.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&candidate[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Parses an analysis response.
///
/// Field shapes are left untouched; normalization happens later.
pub fn parse_analysis(text: &str) -> Result<RawAnalysis> {
    let object = extract_json_object(text).ok_or_else(|| {
        RefinerError::generation("Analysis response did not contain a JSON object")
    })?;
    serde_json::from_value(Value::Object(object))
        .map_err(|e| RefinerError::generation(format!("Analysis response has an invalid shape: {e}")))
}

/// Extracts a single text field from a `{"<field>": "..."}` response.
///
/// Non-string values are serialized back to JSON text. A response that is
/// not such an object is accepted as plain text. Both cases are reported
/// as coercions.
pub fn parse_text_field(text: &str, field: &str) -> Result<Generated<String>> {
    if let Some(mut object) = extract_json_object(text) {
        match object.remove(field) {
            Some(Value::String(value)) => return Ok(Generated::clean(value)),
            Some(Value::Null) | None => {}
            Some(other) => {
                let coercion = ShapeCoercion::new(field, "non-string value serialized to text");
                return Ok(Generated::with_coercions(other.to_string(), vec![coercion]));
            }
        }
    }

    let plain = strip_code_fence(text);
    if plain.is_empty() {
        return Err(RefinerError::generation(format!(
            "Backend returned an empty response for '{field}'"
        )));
    }
    let coercion = ShapeCoercion::new(field, "plain text response used as the field value");
    Ok(Generated::with_coercions(plain.to_string(), vec![coercion]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  plain  "), "plain");
        assert_eq!(strip_code_fence("```\nbody"), "body");
        assert_eq!(strip_code_fence("```inline```"), "```inline```");
    }

    #[test]
    fn test_extract_json_object_with_surrounding_prose() {
        let text = "Sure! Here it is:\n{\"explanation\": \"because\"}\nHope that helps.";
        let object = extract_json_object(text).unwrap();
        assert_eq!(object["explanation"], "because");
    }

    #[test]
    fn test_extract_json_object_rejects_arrays_and_text() {
        assert!(extract_json_object("[1, 2]").is_none());
        assert!(extract_json_object("no json } here {").is_none());
    }

    #[test]
    fn test_parse_analysis_keeps_raw_shapes() {
        let raw = parse_analysis(r#"```json
{"analysis": "ok", "suggestions": "just one", "promptClarityScore": "7"}
```"#)
        .unwrap();
        assert_eq!(raw.analysis, "ok");
        assert_eq!(raw.suggestions, "just one");

        let normalized = raw.normalize();
        assert_eq!(normalized.value.suggestions, vec!["just one".to_string()]);
        assert_eq!(normalized.value.clarity_score, Some(7));
    }

    #[test]
    fn test_parse_analysis_without_json_is_generation_error() {
        let err = parse_analysis("I cannot help with that").unwrap_err();
        assert!(err.is_generation());
    }

    #[test]
    fn test_parse_text_field() {
        let clean = parse_text_field(r#"{"previewPrompt": "new"}"#, "previewPrompt").unwrap();
        assert_eq!(clean.value, "new");
        assert!(clean.coercions.is_empty());

        let nested = parse_text_field(r#"{"enhancedPrompt": {"task": "x"}}"#, "enhancedPrompt").unwrap();
        assert_eq!(nested.value, r#"{"task":"x"}"#);
        assert_eq!(nested.coercions.len(), 1);

        let plain = parse_text_field("Just the explanation.", "explanation").unwrap();
        assert_eq!(plain.value, "Just the explanation.");
        assert_eq!(plain.coercions[0].field, "explanation");

        assert!(parse_text_field("   ", "explanation").unwrap_err().is_generation());
    }
}
