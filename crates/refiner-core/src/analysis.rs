//! Prompt analysis results and the coercion of loosely shaped responses.
//!
//! Backends are asked for a JSON object with a fixed set of fields but are
//! not guaranteed to honor the shape: `suggestions` may come back as a bare
//! string, scores as strings or floats, and so on. [`RawAnalysis`] accepts
//! any JSON value per field and [`RawAnalysis::normalize`] turns it into the
//! canonical [`AnalysisResult`], recording every coercion it performs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::warning::{Generated, ShapeCoercion};

const SCORE_MIN: u8 = 1;
const SCORE_MAX: u8 = 10;

/// The canonical analysis of one prompt.
///
/// Serialized field names follow the gateway wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// General evaluation of the prompt.
    #[serde(rename = "analysis")]
    pub narrative: String,
    /// Improvement suggestions, in display order. Duplicates are allowed.
    #[serde(default)]
    pub suggestions: Vec<String>,

    #[serde(rename = "promptClarityScore", default, skip_serializing_if = "Option::is_none")]
    pub clarity_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarity_score_reasoning: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specificity_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specificity_score_reasoning: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actionability_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actionability_score_reasoning: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conciseness_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conciseness_score_reasoning: Option<String>,

    #[serde(rename = "potentialAmbiguities", default)]
    pub ambiguities: Vec<String>,

    #[serde(rename = "tokenCountEstimation", default, skip_serializing_if = "Option::is_none")]
    pub token_estimate: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_rating_reasoning: Option<String>,

    #[serde(rename = "suggestedModel", default, skip_serializing_if = "Option::is_none")]
    pub recommended_model: Option<String>,
    #[serde(rename = "modelSuggestionReasoning", default, skip_serializing_if = "Option::is_none")]
    pub recommended_model_reasoning: Option<String>,
}

impl AnalysisResult {
    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }
}

/// An analysis response exactly as the backend produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysis {
    #[serde(default)]
    pub analysis: Value,
    #[serde(default)]
    pub suggestions: Value,
    #[serde(default)]
    pub prompt_clarity_score: Value,
    #[serde(default)]
    pub clarity_score_reasoning: Value,
    #[serde(default)]
    pub specificity_score: Value,
    #[serde(default)]
    pub specificity_score_reasoning: Value,
    #[serde(default)]
    pub actionability_score: Value,
    #[serde(default)]
    pub actionability_score_reasoning: Value,
    #[serde(default)]
    pub conciseness_score: Value,
    #[serde(default)]
    pub conciseness_score_reasoning: Value,
    #[serde(default)]
    pub potential_ambiguities: Value,
    #[serde(default)]
    pub token_count_estimation: Value,
    #[serde(default)]
    pub overall_rating: Value,
    #[serde(default)]
    pub overall_rating_reasoning: Value,
    #[serde(default)]
    pub suggested_model: Value,
    #[serde(default)]
    pub model_suggestion_reasoning: Value,
}

impl From<AnalysisResult> for RawAnalysis {
    fn from(result: AnalysisResult) -> Self {
        // Serializing a plain struct of strings and numbers cannot fail.
        serde_json::to_value(result)
            .ok()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }
}

impl RawAnalysis {
    /// Coerces every field into its canonical shape.
    pub fn normalize(self) -> Generated<AnalysisResult> {
        let mut coercions = Vec::new();
        let c = &mut coercions;

        let narrative = match coerce_text("analysis", self.analysis, c) {
            Some(text) => text,
            None => {
                c.push(ShapeCoercion::new("analysis", "missing narrative replaced with empty text"));
                String::new()
            }
        };

        let result = AnalysisResult {
            narrative,
            suggestions: coerce_string_list("suggestions", self.suggestions, true, c),
            clarity_score: coerce_score("promptClarityScore", self.prompt_clarity_score, c),
            clarity_score_reasoning: coerce_text(
                "clarityScoreReasoning",
                self.clarity_score_reasoning,
                c,
            ),
            specificity_score: coerce_score("specificityScore", self.specificity_score, c),
            specificity_score_reasoning: coerce_text(
                "specificityScoreReasoning",
                self.specificity_score_reasoning,
                c,
            ),
            actionability_score: coerce_score("actionabilityScore", self.actionability_score, c),
            actionability_score_reasoning: coerce_text(
                "actionabilityScoreReasoning",
                self.actionability_score_reasoning,
                c,
            ),
            conciseness_score: coerce_score("concisenessScore", self.conciseness_score, c),
            conciseness_score_reasoning: coerce_text(
                "concisenessScoreReasoning",
                self.conciseness_score_reasoning,
                c,
            ),
            ambiguities: coerce_string_list(
                "potentialAmbiguities",
                self.potential_ambiguities,
                false,
                c,
            ),
            token_estimate: coerce_count("tokenCountEstimation", self.token_count_estimation, c),
            overall_rating: coerce_text("overallRating", self.overall_rating, c),
            overall_rating_reasoning: coerce_text(
                "overallRatingReasoning",
                self.overall_rating_reasoning,
                c,
            ),
            recommended_model: coerce_text("suggestedModel", self.suggested_model, c),
            recommended_model_reasoning: coerce_text(
                "modelSuggestionReasoning",
                self.model_suggestion_reasoning,
                c,
            ),
        };

        for coercion in &coercions {
            tracing::warn!(field = %coercion.field, detail = %coercion.detail, "Coerced analysis response");
        }

        Generated::with_coercions(result, coercions)
    }
}

/// Coerces a list-of-strings field.
///
/// A bare string becomes a one-element list; anything else that is not a
/// list becomes an empty list. Missing optional lists are not reported.
pub fn coerce_string_list(
    field: &str,
    value: Value,
    required: bool,
    coercions: &mut Vec<ShapeCoercion>,
) -> Vec<String> {
    match value {
        Value::Array(items) => {
            let total = items.len();
            let list: Vec<String> = items.into_iter().filter_map(scalar_to_string).collect();
            let skipped = items_skipped(total, &list);
            if skipped > 0 {
                coercions.push(ShapeCoercion::new(
                    field,
                    format!("dropped {skipped} non-text list item(s)"),
                ));
            }
            list
        }
        Value::String(text) => {
            coercions.push(ShapeCoercion::new(field, "bare string wrapped into a list"));
            vec![text]
        }
        Value::Null if !required => Vec::new(),
        other => {
            coercions.push(ShapeCoercion::new(
                field,
                format!("{} replaced with an empty list", json_kind(&other)),
            ));
            Vec::new()
        }
    }
}

fn items_skipped(total: usize, kept: &[String]) -> usize {
    total - kept.len()
}

fn scalar_to_string(item: Value) -> Option<String> {
    match item {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn coerce_text(field: &str, value: Value, coercions: &mut Vec<ShapeCoercion>) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Number(number) => {
            coercions.push(ShapeCoercion::new(field, "number converted to text"));
            Some(number.to_string())
        }
        Value::Bool(flag) => {
            coercions.push(ShapeCoercion::new(field, "boolean converted to text"));
            Some(flag.to_string())
        }
        Value::Array(items) => {
            coercions.push(ShapeCoercion::new(field, "list joined into text"));
            let parts: Vec<String> = items.into_iter().filter_map(scalar_to_string).collect();
            Some(parts.join("\n"))
        }
        other @ Value::Object(_) => {
            coercions.push(ShapeCoercion::new(field, "object serialized into text"));
            Some(other.to_string())
        }
    }
}

fn coerce_score(field: &str, value: Value, coercions: &mut Vec<ShapeCoercion>) -> Option<u8> {
    let number = match &value {
        Value::Null => return None,
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let parsed = text.trim().parse::<f64>().ok();
            if parsed.is_some() {
                coercions.push(ShapeCoercion::new(field, "numeric text parsed as score"));
            }
            parsed
        }
        _ => None,
    };

    let Some(number) = number.filter(|n| n.is_finite()) else {
        coercions.push(ShapeCoercion::new(
            field,
            format!("unusable {} dropped", json_kind(&value)),
        ));
        return None;
    };

    let rounded = number.round();
    if rounded != number {
        coercions.push(ShapeCoercion::new(field, format!("{number} rounded")));
    }
    let clamped = rounded.clamp(f64::from(SCORE_MIN), f64::from(SCORE_MAX));
    if clamped != rounded {
        coercions.push(ShapeCoercion::new(
            field,
            format!("{rounded} clamped to {SCORE_MIN}-{SCORE_MAX}"),
        ));
    }
    Some(clamped as u8)
}

fn coerce_count(field: &str, value: Value, coercions: &mut Vec<ShapeCoercion>) -> Option<u32> {
    let number = match &value {
        Value::Null => return None,
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let parsed = text.trim().parse::<f64>().ok();
            if parsed.is_some() {
                coercions.push(ShapeCoercion::new(field, "numeric text parsed as count"));
            }
            parsed
        }
        _ => None,
    };

    match number.filter(|n| n.is_finite() && *n >= 0.0) {
        Some(n) => Some(n.round().min(f64::from(u32::MAX)) as u32),
        None => {
            coercions.push(ShapeCoercion::new(
                field,
                format!("unusable {} dropped", json_kind(&value)),
            ));
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawAnalysis {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_canonical_response_needs_no_coercion() {
        let generated = raw(json!({
            "analysis": "Reasonable prompt",
            "suggestions": ["Name the audience", "Ask for bullet points"],
            "promptClarityScore": 7,
            "clarityScoreReasoning": "Mostly clear",
            "potentialAmbiguities": ["'short'"],
            "tokenCountEstimation": 42,
            "overallRating": "Good Start",
            "suggestedModel": "Google Gemini 2.5 Pro",
            "modelSuggestionReasoning": "General purpose"
        }))
        .normalize();

        assert!(generated.coercions.is_empty());
        let result = generated.value;
        assert_eq!(result.narrative, "Reasonable prompt");
        assert_eq!(result.suggestions.len(), 2);
        assert_eq!(result.clarity_score, Some(7));
        assert_eq!(result.ambiguities, vec!["'short'".to_string()]);
        assert_eq!(result.token_estimate, Some(42));
        assert_eq!(result.recommended_model.as_deref(), Some("Google Gemini 2.5 Pro"));
        assert!(result.specificity_score.is_none());
    }

    #[test]
    fn test_bare_string_suggestions_become_list() {
        let generated = raw(json!({
            "analysis": "ok",
            "suggestions": "Be more specific"
        }))
        .normalize();

        assert_eq!(generated.value.suggestions, vec!["Be more specific".to_string()]);
        assert!(generated.coercions.iter().any(|c| c.field == "suggestions"));
    }

    #[test]
    fn test_blank_string_suggestion_is_still_wrapped() {
        let generated = raw(json!({ "analysis": "ok", "suggestions": "" })).normalize();
        assert_eq!(generated.value.suggestions, vec![String::new()]);
        assert!(generated.value.has_suggestions());
    }

    #[test]
    fn test_non_list_suggestions_become_empty() {
        for odd in [json!(12), json!({"a": 1}), json!(true), Value::Null] {
            let generated = raw(json!({ "analysis": "ok", "suggestions": odd })).normalize();
            assert!(generated.value.suggestions.is_empty());
            assert!(generated.coercions.iter().any(|c| c.field == "suggestions"));
        }
    }

    #[test]
    fn test_ambiguities_coerced_like_suggestions() {
        let generated = raw(json!({
            "analysis": "ok",
            "suggestions": [],
            "potentialAmbiguities": "'it' is unclear"
        }))
        .normalize();
        assert_eq!(generated.value.ambiguities, vec!["'it' is unclear".to_string()]);

        let missing = raw(json!({ "analysis": "ok", "suggestions": [] })).normalize();
        assert!(missing.value.ambiguities.is_empty());
        assert!(missing.coercions.is_empty());
    }

    #[test]
    fn test_scores_are_parsed_rounded_and_clamped() {
        let generated = raw(json!({
            "analysis": "ok",
            "suggestions": [],
            "promptClarityScore": "8",
            "specificityScore": 6.6,
            "actionabilityScore": 14,
            "concisenessScore": "n/a"
        }))
        .normalize();

        let result = generated.value;
        assert_eq!(result.clarity_score, Some(8));
        assert_eq!(result.specificity_score, Some(7));
        assert_eq!(result.actionability_score, Some(10));
        assert_eq!(result.conciseness_score, None);
        assert_eq!(generated.coercions.len(), 4);
    }

    #[test]
    fn test_mixed_list_items() {
        let generated = raw(json!({
            "analysis": "ok",
            "suggestions": ["one", 2, null, {"x": 1}]
        }))
        .normalize();
        assert_eq!(generated.value.suggestions, vec!["one".to_string(), "2".to_string()]);
        assert_eq!(generated.coercions.len(), 1);
    }

    #[test]
    fn test_missing_narrative() {
        let generated = raw(json!({ "suggestions": [] })).normalize();
        assert_eq!(generated.value.narrative, "");
        assert!(generated.coercions.iter().any(|c| c.field == "analysis"));
    }

    #[test]
    fn test_result_uses_wire_names() {
        let result = AnalysisResult {
            narrative: "n".into(),
            suggestions: vec!["s".into()],
            clarity_score: Some(5),
            ..AnalysisResult::default()
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["analysis"], "n");
        assert_eq!(value["promptClarityScore"], 5);
        assert!(value.get("specificityScore").is_none());
    }

    #[test]
    fn test_raw_from_result_round_trips() {
        let result = AnalysisResult {
            narrative: "n".into(),
            suggestions: vec!["s".into()],
            token_estimate: Some(12),
            ..AnalysisResult::default()
        };
        let generated = RawAnalysis::from(result.clone()).normalize();
        assert!(generated.coercions.is_empty());
        assert_eq!(generated.value, result);
    }
}
