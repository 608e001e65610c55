//! The generation gateway: the only collaborator that performs analysis
//! and rewriting.
//!
//! Each operation is a stateless request/response mapping. Request and
//! response field names are the wire contract of template-based backends.

use serde::{Deserialize, Serialize};

use crate::analysis::RawAnalysis;
use crate::context::{ModelClass, PromptContext};
use crate::error::Result;
use crate::output::{EnhancedPrompt, OutputFormat};
use crate::warning::Generated;

/// Rewrite the original prompt to include exactly one suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySuggestionRequest {
    pub original_prompt: String,
    pub suggestion_to_apply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_instructions: Option<String>,
}

/// The prompt with one suggestion applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionPreview {
    #[serde(rename = "previewPrompt")]
    pub preview_text: String,
}

/// Explain why a suggestion improves the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainSuggestionRequest {
    pub original_prompt: String,
    pub suggestion_to_explain: String,
    #[serde(rename = "llmType", default, skip_serializing_if = "Option::is_none")]
    pub model_class: Option<ModelClass>,
    #[serde(rename = "isDeepResearch", default, skip_serializing_if = "Option::is_none")]
    pub deep_research: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionExplanation {
    pub explanation: String,
}

/// Produce the final prompt from the original and the selected suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    pub original_prompt: String,
    /// May be empty, in which case a general refinement is requested.
    pub suggestions: Vec<String>,
    pub format: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_instructions: Option<String>,
}

/// A single-shot generation with no knowledge of chaining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStepRequest {
    pub prompt_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStepOutput {
    pub output_text: String,
}

/// The external text-generation capability.
///
/// Implementations fail with [`crate::RefinerError::Generation`] when the
/// backend is unreachable or its answer cannot be coerced. Analysis
/// responses are returned raw; the caller normalizes them.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    async fn analyze(&self, context: &PromptContext) -> Result<Generated<RawAnalysis>>;

    async fn apply_suggestion(
        &self,
        request: &ApplySuggestionRequest,
    ) -> Result<Generated<SuggestionPreview>>;

    async fn explain_suggestion(
        &self,
        request: &ExplainSuggestionRequest,
    ) -> Result<Generated<SuggestionExplanation>>;

    async fn enhance(&self, request: &EnhanceRequest) -> Result<Generated<EnhancedPrompt>>;

    async fn run_chain_step(&self, request: &ChainStepRequest) -> Result<Generated<ChainStepOutput>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_request_wire_names() {
        let request = ExplainSuggestionRequest {
            original_prompt: "Write a poem".into(),
            suggestion_to_explain: "Specify meter".into(),
            model_class: Some(ModelClass::Creative),
            deep_research: None,
            persona_instructions: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["originalPrompt"], "Write a poem");
        assert_eq!(value["suggestionToExplain"], "Specify meter");
        assert_eq!(value["llmType"], "creative");
        assert!(value.get("isDeepResearch").is_none());
    }

    #[test]
    fn test_enhance_request_wire_names() {
        let request = EnhanceRequest {
            original_prompt: "p".into(),
            suggestions: vec![],
            format: OutputFormat::Json,
            persona_instructions: Some("be terse".into()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["format"], "json");
        assert_eq!(value["personaInstructions"], "be terse");
        assert!(value["suggestions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_preview_wire_name() {
        let preview: SuggestionPreview =
            serde_json::from_str(r#"{"previewPrompt":"new text"}"#).unwrap();
        assert_eq!(preview.preview_text, "new text");
    }
}
