//! Built-in starter prompts and the model catalogue offered to the analyzer.

use serde::{Deserialize, Serialize};

use crate::context::{ModelClass, PromptContext};

/// A curated starting point for a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    pub title: String,
    pub description: String,
    #[serde(rename = "llmType", default, skip_serializing_if = "Option::is_none")]
    pub model_class: Option<ModelClass>,
    #[serde(rename = "isDeepResearch", default)]
    pub deep_research: bool,
    pub prompt: String,
}

impl PromptTemplate {
    fn builtin(
        title: &str,
        description: &str,
        model_class: Option<ModelClass>,
        deep_research: bool,
        prompt: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            model_class,
            deep_research,
            prompt: prompt.to_string(),
        }
    }

    /// A prompt context pre-filled from this template.
    pub fn to_context(&self) -> PromptContext {
        let mut context = PromptContext::new(self.prompt.clone());
        context.target_model_class = self.model_class;
        if self.deep_research {
            context.deep_research = Some(true);
        }
        context
    }
}

/// The starter templates shipped with the refiner.
pub fn builtin_templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate::builtin(
            "Code Review",
            "Ask for a structured review of a code snippet.",
            Some(ModelClass::Code),
            false,
            "Review the following function for bugs, readability and performance. \
             List each issue with a severity and a suggested fix.\n\n[paste code here]",
        ),
        PromptTemplate::builtin(
            "Short Story",
            "Generate a short story with a defined tone and length.",
            Some(ModelClass::Creative),
            false,
            "Write a 500-word short story about a lighthouse keeper who receives a letter \
             from the future. Use a melancholic but hopeful tone.",
        ),
        PromptTemplate::builtin(
            "Product Image",
            "Describe a product shot for an image model.",
            Some(ModelClass::Image),
            false,
            "A studio photograph of a matte black coffee grinder on a walnut table, \
             soft morning light from the left, shallow depth of field.",
        ),
        PromptTemplate::builtin(
            "Literature Survey",
            "Collect and compare sources on a research question.",
            Some(ModelClass::Research),
            true,
            "Summarize peer-reviewed research from the last five years on the effect of \
             sleep duration on working memory. Cite each source and note sample sizes.",
        ),
        PromptTemplate::builtin(
            "Meeting Summary",
            "Turn raw notes into decisions and action items.",
            Some(ModelClass::General),
            false,
            "Summarize these meeting notes into decisions, open questions and action items \
             with owners.\n\n[paste notes here]",
        ),
    ]
}

/// Models the analyzer may recommend.
pub const RECOMMENDABLE_MODELS: &[&str] = &[
    "OpenAI GPT-4.1",
    "OpenAI GPT-4o",
    "OpenAI GPT-3.5",
    "OpenAI GPT-4 Mini",
    "Anthropic Claude 3.7 Sonnet",
    "Anthropic Claude 3 Opus",
    "Google Gemini 2.5 Pro",
    "Google Gemini Ultra 1.0",
    "Meta Llama 4 Maverick",
    "Meta Llama 4 Scout",
    "Meta Llama 3.1 70B",
    "Mistral Large 2",
    "Mistral Mixtral 8x22B Instruct",
    "Mistral Codestral 22B",
    "Cohere Command A",
    "Cohere Command R+",
    "Aleph Alpha Pharia-1-LLM-7B-control",
    "Perplexity Sonar Reasoning Pro High",
];
