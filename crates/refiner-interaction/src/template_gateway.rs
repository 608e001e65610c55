//! [`Gateway`] implementation over a [`TextBackend`].

use crate::backends::{GenerationInput, TextBackend};
use crate::prompts::PromptRenderer;
use crate::response::{parse_analysis, parse_text_field, strip_code_fence};
use refiner_core::analysis::RawAnalysis;
use refiner_core::context::PromptContext;
use refiner_core::error::Result;
use refiner_core::gateway::{
    ApplySuggestionRequest, ChainStepOutput, ChainStepRequest, EnhanceRequest,
    ExplainSuggestionRequest, Gateway, SuggestionExplanation, SuggestionPreview,
};
use refiner_core::output::{EnhancedPrompt, OutputFormat};
use refiner_core::warning::{Generated, ShapeCoercion};

/// Renders a prompt per operation, sends it to the backend and parses the
/// answer back into the response type.
pub struct TemplateGateway<B: TextBackend> {
    backend: B,
    prompts: PromptRenderer,
}

impl<B: TextBackend> TemplateGateway<B> {
    pub fn new(backend: B) -> Result<Self> {
        Ok(Self {
            backend,
            prompts: PromptRenderer::new()?,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn generate(&self, operation: &str, input: GenerationInput) -> Result<String> {
        tracing::debug!(backend = self.backend.name(), operation, "Dispatching generation");
        let text = self.backend.generate(&input).await?;
        tracing::debug!(backend = self.backend.name(), operation, chars = text.len(), "Generation finished");
        Ok(text)
    }
}

#[async_trait::async_trait]
impl<B: TextBackend> Gateway for TemplateGateway<B> {
    async fn analyze(&self, context: &PromptContext) -> Result<Generated<RawAnalysis>> {
        let prompt = self.prompts.analyze(context)?;
        let input = GenerationInput::text(prompt).with_image(context.image());
        let text = self.generate("analyze", input).await?;
        Ok(Generated::clean(parse_analysis(&text)?))
    }

    async fn apply_suggestion(
        &self,
        request: &ApplySuggestionRequest,
    ) -> Result<Generated<SuggestionPreview>> {
        let prompt = self.prompts.apply_suggestion(request)?;
        let text = self.generate("apply_suggestion", GenerationInput::text(prompt)).await?;
        Ok(parse_text_field(&text, "previewPrompt")?
            .map(|preview_text| SuggestionPreview { preview_text }))
    }

    async fn explain_suggestion(
        &self,
        request: &ExplainSuggestionRequest,
    ) -> Result<Generated<SuggestionExplanation>> {
        let prompt = self.prompts.explain_suggestion(request)?;
        let text = self.generate("explain_suggestion", GenerationInput::text(prompt)).await?;
        Ok(parse_text_field(&text, "explanation")?
            .map(|explanation| SuggestionExplanation { explanation }))
    }

    async fn enhance(&self, request: &EnhanceRequest) -> Result<Generated<EnhancedPrompt>> {
        let prompt = self.prompts.enhance(request)?;
        let text = self.generate("enhance", GenerationInput::text(prompt)).await?;
        let format = request.format;

        let Generated {
            value: mut enhanced_text,
            mut coercions,
        } = parse_text_field(&text, "enhancedPrompt")?;

        if format == OutputFormat::Json {
            enhanced_text = strip_code_fence(&enhanced_text).to_string();
            if serde_json::from_str::<serde_json::Value>(&enhanced_text).is_err() {
                tracing::warn!("Enhanced prompt requested as JSON is not valid JSON");
                coercions.push(ShapeCoercion::new(
                    "enhancedPrompt",
                    "requested JSON is not valid JSON; text returned unchanged",
                ));
            }
        }

        Ok(Generated::with_coercions(
            EnhancedPrompt {
                enhanced_text,
                format,
            },
            coercions,
        ))
    }

    async fn run_chain_step(&self, request: &ChainStepRequest) -> Result<Generated<ChainStepOutput>> {
        let output_text = self
            .generate("run_chain_step", GenerationInput::text(request.prompt_text.clone()))
            .await?;
        Ok(Generated::clean(ChainStepOutput { output_text }))
    }
}
