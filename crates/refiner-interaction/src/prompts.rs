//! Prompt templates sent to the text backend.
//!
//! Every operation except chain steps renders a minijinja template. The
//! backend is asked to answer with a JSON object whose keys are the wire
//! field names of the corresponding response.

use minijinja::{Environment, context};
use refiner_core::context::PromptContext;
use refiner_core::error::{RefinerError, Result};
use refiner_core::gateway::{ApplySuggestionRequest, EnhanceRequest, ExplainSuggestionRequest};
use refiner_core::template::RECOMMENDABLE_MODELS;

const ANALYZE: &str = "analyze.txt";
const APPLY_SUGGESTION: &str = "apply_suggestion.txt";
const EXPLAIN_SUGGESTION: &str = "explain_suggestion.txt";
const ENHANCE: &str = "enhance.txt";

const PERSONA_BLOCK: &str = r#"{% if persona_instructions %}
Active persona instructions (your answer must align with them):
---
{{ persona_instructions }}
---
{% endif %}"#;

const ANALYZE_TEMPLATE: &str = r#"You are a prompt analyst and LLM consultant. Evaluate the prompt below thoroughly.

Context:
{% if llm_type %}- Target model type: {{ llm_type }}. Tailor suggestions to this kind of model.
{% endif %}{% if is_deep_research %}- Deep research: yes. Favor suggestions that yield comprehensive, sourced and well-structured results.
{% else %}- Deep research: no
{% endif %}{% if has_image %}- An image accompanies the prompt; take it into account.
{% endif %}
{% include "persona_block" %}
Prompt:
{{ prompt }}

Produce:
1. "analysis": a general evaluation of the prompt.
2. "suggestions": an array of specific, actionable improvements.
3. "overallRating" and "overallRatingReasoning": a qualitative rating such as "Needs Significant Improvement", "Good Start" or "Excellent", with a short justification.
4. "promptClarityScore" and "clarityScoreReasoning": integer 1 (very unclear) to 10 (very clear).
5. "specificityScore" and "specificityScoreReasoning": integer 1 (very vague) to 10 (very specific).
6. "actionabilityScore" and "actionabilityScoreReasoning": integer 1 (unclear task) to 10 (clear task).
7. "concisenessScore" and "concisenessScoreReasoning": integer 1 (very wordy) to 10 (very concise).
8. "potentialAmbiguities": an array of words or phrases open to several interpretations, empty if none.
9. "tokenCountEstimation": a rough token count for the prompt.
10. "suggestedModel" and "modelSuggestionReasoning": the best fit from the models below. If the prompt is too vague, say so in both fields. Never leave them empty.

Available models:
{% for model in models %}- {{ model }}
{% endfor %}
Respond with a single JSON object containing exactly these keys and nothing else."#;

const APPLY_SUGGESTION_TEMPLATE: &str = r#"You help refine prompts.
Rewrite the original prompt so that it incorporates ONLY the suggestion below. Preserve the original intent.
{% include "persona_block" %}
Original prompt:
{{ original_prompt }}

Suggestion to apply:
{{ suggestion }}

Respond with a single JSON object: {"previewPrompt": "<the rewritten prompt>"}"#;

const EXPLAIN_SUGGESTION_TEMPLATE: &str = r#"You teach prompt engineering.
Explain why the suggestion below improves the original prompt, naming the underlying principle where one applies.
{% if llm_type %}The prompt is intended for a '{{ llm_type }}' model.
{% endif %}{% if is_deep_research %}The prompt is intended for deep research.
{% endif %}{% include "persona_block" %}
Original prompt:
{{ original_prompt }}

Suggestion to explain:
{{ suggestion }}

Respond with a single JSON object: {"explanation": "<your explanation>"}"#;

const ENHANCE_TEMPLATE: &str = r#"You are a prompt enhancer.
Create the best possible version of the original prompt.
{% include "persona_block" %}
Original prompt:
{{ original_prompt }}

{% if suggestions %}Incorporate these selected suggestions:
{% for suggestion in suggestions %}- {{ suggestion }}
{% endfor %}{% else %}No suggestions were selected. Refine the prompt for overall quality, clarity and completeness.
{% endif %}
The enhanced prompt must be written in {{ format }} format{% if format == "json" %} and be valid JSON{% endif %}.
Respond with a single JSON object: {"enhancedPrompt": <the enhanced prompt>}"#;

/// Renders the operation prompts.
pub struct PromptRenderer {
    env: Environment<'static>,
}

impl PromptRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in [
            ("persona_block", PERSONA_BLOCK),
            (ANALYZE, ANALYZE_TEMPLATE),
            (APPLY_SUGGESTION, APPLY_SUGGESTION_TEMPLATE),
            (EXPLAIN_SUGGESTION, EXPLAIN_SUGGESTION_TEMPLATE),
            (ENHANCE, ENHANCE_TEMPLATE),
        ] {
            env.add_template(name, source).map_err(template_error)?;
        }
        Ok(Self { env })
    }

    pub fn analyze(&self, prompt: &PromptContext) -> Result<String> {
        self.render(
            ANALYZE,
            context! {
                prompt => &prompt.text,
                llm_type => prompt.target_model_class.map(|class| class.to_string()),
                is_deep_research => prompt.deep_research.unwrap_or(false),
                has_image => prompt.image_reference.is_some(),
                persona_instructions => &prompt.persona_instructions,
                models => RECOMMENDABLE_MODELS,
            },
        )
    }

    pub fn apply_suggestion(&self, request: &ApplySuggestionRequest) -> Result<String> {
        self.render(
            APPLY_SUGGESTION,
            context! {
                original_prompt => &request.original_prompt,
                suggestion => &request.suggestion_to_apply,
                persona_instructions => &request.persona_instructions,
            },
        )
    }

    pub fn explain_suggestion(&self, request: &ExplainSuggestionRequest) -> Result<String> {
        self.render(
            EXPLAIN_SUGGESTION,
            context! {
                original_prompt => &request.original_prompt,
                suggestion => &request.suggestion_to_explain,
                llm_type => request.model_class.map(|class| class.to_string()),
                is_deep_research => request.deep_research.unwrap_or(false),
                persona_instructions => &request.persona_instructions,
            },
        )
    }

    pub fn enhance(&self, request: &EnhanceRequest) -> Result<String> {
        self.render(
            ENHANCE,
            context! {
                original_prompt => &request.original_prompt,
                suggestions => &request.suggestions,
                format => request.format.to_string(),
                persona_instructions => &request.persona_instructions,
            },
        )
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .map_err(template_error)
    }
}

fn template_error(err: minijinja::Error) -> RefinerError {
    RefinerError::internal(format!("Prompt template error: {err}"))
}
