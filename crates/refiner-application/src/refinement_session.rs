//! The refinement workflow: analyze, preview, explain, enhance and chain.
//!
//! Gateway calls run without holding the state lock, so operations of
//! different kinds may be in flight at the same time. Within one kind the
//! newest request wins; see [`crate::operation_state`].

use crate::history_service::HistoryService;
use crate::persona_service::PersonaService;
use crate::refinement_state::RefinementState;
use refiner_core::analysis::{AnalysisResult, RawAnalysis};
use refiner_core::chain::{ChainRun, substitute_step1_output};
use refiner_core::config::StorageConfig;
use refiner_core::context::PromptContext;
use refiner_core::error::{RefinerError, Result};
use refiner_core::gateway::{
    ApplySuggestionRequest, ChainStepRequest, EnhanceRequest, ExplainSuggestionRequest, Gateway,
    SuggestionExplanation, SuggestionPreview,
};
use refiner_core::history::HistoryRecord;
use refiner_core::output::{EnhancedPrompt, ExportArtifact, OutputFormat};
use refiner_core::persona::Persona;
use refiner_core::store::CollectionStore;
use refiner_core::warning::{Generated, Outcome, Warning};
use std::sync::Arc;
use tokio::sync::RwLock;

/// One user's refinement workspace.
pub struct RefinementSession {
    gateway: Arc<dyn Gateway>,
    history: HistoryService,
    personas: PersonaService,
    state: RwLock<RefinementState>,
}

impl RefinementSession {
    pub fn new(gateway: Arc<dyn Gateway>, history: HistoryService, personas: PersonaService) -> Self {
        Self {
            gateway,
            history,
            personas,
            state: RwLock::new(RefinementState::default()),
        }
    }

    /// Loads both collections once and creates the session.
    pub async fn open(
        gateway: Arc<dyn Gateway>,
        history_store: Arc<dyn CollectionStore<HistoryRecord>>,
        persona_store: Arc<dyn CollectionStore<Persona>>,
        storage: &StorageConfig,
    ) -> Result<Self> {
        let history = HistoryService::load(history_store, storage.history_capacity).await?;
        let personas = PersonaService::load(persona_store, storage.persona_capacity).await?;
        Ok(Self::new(gateway, history, personas))
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    pub fn personas(&self) -> &PersonaService {
        &self.personas
    }

    /// A snapshot of the current state.
    pub async fn state(&self) -> RefinementState {
        self.state.read().await.clone()
    }

    /// Analyzes a prompt and records it in the history.
    ///
    /// Blank text fails with a validation error before the gateway is
    /// called. On success every suggestion is marked as included.
    pub async fn analyze(&self, context: PromptContext) -> Result<Outcome<AnalysisResult>> {
        let (context, mut warnings) = context.validated()?;
        let dispatched = self.compose_persona(context.clone()).await;

        let token = {
            let mut state = self.state.write().await;
            state.context = Some(context);
            state.included.clear();
            state.reset_derived();
            state.analysis.begin()
        };
        tracing::debug!(token = token.value(), "Dispatching analysis");

        let result = self.gateway.analyze(&dispatched).await.map(normalize_analysis);

        let generated = {
            let mut state = self.state.write().await;
            let generated = state.analysis.resolve(token, result)?;
            state.include_all();
            generated
        };

        let analysis = generated.value;
        if let Err(err) = self
            .history
            .add(HistoryRecord::new(dispatched, analysis.clone()))
            .await
        {
            tracing::warn!(error = %err, "Failed to persist history record");
        }

        warnings.extend(generated.coercions.into_iter().map(Warning::from));
        tracing::info!(
            suggestions = analysis.suggestions.len(),
            warnings = warnings.len(),
            "Analysis complete"
        );
        Ok(Outcome::new(analysis, warnings))
    }

    /// Previews the analyzed prompt with one suggestion applied.
    ///
    /// Neither the history nor the analysis is modified.
    pub async fn preview_suggestion(&self, suggestion: &str) -> Result<Outcome<SuggestionPreview>> {
        let suggestion = require_suggestion(suggestion)?;
        let context = self.current_context().await?;
        let request = ApplySuggestionRequest {
            original_prompt: context.text.clone(),
            suggestion_to_apply: suggestion,
            persona_instructions: self.persona_instructions_for(&context).await,
        };

        let token = self.state.write().await.preview.begin();
        tracing::debug!(token = token.value(), "Dispatching suggestion preview");
        let result = self.gateway.apply_suggestion(&request).await;
        let generated = self.state.write().await.preview.resolve(token, result)?;
        Ok(into_outcome(generated))
    }

    /// Explains why a suggestion improves the analyzed prompt.
    pub async fn explain_suggestion(
        &self,
        suggestion: &str,
    ) -> Result<Outcome<SuggestionExplanation>> {
        let suggestion = require_suggestion(suggestion)?;
        let context = self.current_context().await?;
        let request = ExplainSuggestionRequest {
            original_prompt: context.text.clone(),
            suggestion_to_explain: suggestion,
            model_class: context.target_model_class,
            deep_research: context.deep_research,
            persona_instructions: self.persona_instructions_for(&context).await,
        };

        let token = self.state.write().await.explanation.begin();
        tracing::debug!(token = token.value(), "Dispatching suggestion explanation");
        let result = self.gateway.explain_suggestion(&request).await;
        let generated = self.state.write().await.explanation.resolve(token, result)?;
        Ok(into_outcome(generated))
    }

    /// Produces the final prompt from the suggestions still included.
    ///
    /// An analysis without suggestions asks for a general refinement; an
    /// analysis whose suggestions were all excluded is rejected.
    pub async fn enhance(&self, format: OutputFormat) -> Result<Outcome<EnhancedPrompt>> {
        let context = self.current_context().await?;
        let persona_instructions = self.persona_instructions_for(&context).await;

        let (request, token) = {
            let mut state = self.state.write().await;
            let analysis = state.analysis.value().ok_or_else(|| {
                RefinerError::validation("Analyze the prompt before generating an enhanced version")
            })?;
            let suggestions = state.included_suggestions();
            if analysis.has_suggestions() && suggestions.is_empty() {
                return Err(RefinerError::validation(
                    "Select at least one suggestion to include in the enhanced prompt",
                ));
            }

            let request = EnhanceRequest {
                original_prompt: context.text.clone(),
                suggestions,
                format,
                persona_instructions,
            };
            (request, state.enhancement.begin())
        };
        tracing::debug!(
            token = token.value(),
            %format,
            suggestions = request.suggestions.len(),
            "Dispatching enhancement"
        );

        let result = self.gateway.enhance(&request).await;
        let generated = self.state.write().await.enhancement.resolve(token, result)?;
        tracing::info!(%format, "Enhanced prompt generated");
        Ok(into_outcome(generated))
    }

    /// Runs a two-step chain.
    ///
    /// Every `{{step1Output}}` in `step2_template` is replaced with the
    /// literal output of step 1. If step 2 fails, the step 1 output stays
    /// available in the state.
    pub async fn run_chain(&self, step1_prompt: &str, step2_template: &str) -> Result<Outcome<ChainRun>> {
        if step1_prompt.trim().is_empty() || step2_template.trim().is_empty() {
            return Err(RefinerError::validation(
                "Both the step 1 prompt and the step 2 template are required",
            ));
        }

        let token = {
            let mut state = self.state.write().await;
            state.chain_step1_output = None;
            state.chain.begin()
        };
        tracing::debug!(token = token.value(), "Dispatching chain step 1");

        let first = ChainStepRequest {
            prompt_text: step1_prompt.to_string(),
        };
        let step1 = match self.gateway.run_chain_step(&first).await {
            Ok(step1) => step1,
            Err(err) => return Err(self.state.write().await.chain.fail(token, err)),
        };

        {
            let mut state = self.state.write().await;
            state.chain.check_current(token)?;
            state.chain_step1_output = Some(step1.value.output_text.clone());
        }

        let step2_prompt = substitute_step1_output(step2_template, &step1.value.output_text);
        tracing::debug!(token = token.value(), "Dispatching chain step 2");
        let second = ChainStepRequest {
            prompt_text: step2_prompt.clone(),
        };
        let result = self.gateway.run_chain_step(&second).await.map(|step2| {
            let mut coercions = step1.coercions;
            coercions.extend(step2.coercions);
            Generated::with_coercions(
                ChainRun {
                    step1_output: step1.value.output_text,
                    step2_prompt,
                    final_output: step2.value.output_text,
                },
                coercions,
            )
        });

        let generated = self.state.write().await.chain.resolve(token, result)?;
        tracing::info!("Chain run complete");
        Ok(into_outcome(generated))
    }

    /// Flips the inclusion flag of one suggestion and returns the new value.
    pub async fn toggle_suggestion(&self, index: usize) -> Result<bool> {
        self.state.write().await.toggle_included(index)
    }

    pub async fn set_suggestion_included(&self, index: usize, included: bool) -> Result<()> {
        self.state.write().await.set_included(index, included)
    }

    pub async fn included_suggestions(&self) -> Vec<String> {
        self.state.read().await.included_suggestions()
    }

    /// Restores a history record as the current analysis.
    ///
    /// The stored persona instructions are not restored; later calls use
    /// whichever persona is selected at that time.
    pub async fn load_history_record(&self, id: &str) -> Result<HistoryRecord> {
        let record = self.history.find(id).await?;

        let mut state = self.state.write().await;
        state.context = Some(PromptContext {
            persona_instructions: None,
            ..record.context.clone()
        });
        state.analysis.restore(record.result.clone());
        state.include_all();
        state.reset_derived();

        tracing::debug!(record_id = %record.id, "Loaded history record");
        Ok(record)
    }

    /// Packages the current enhanced prompt as `<basename>.md` or `.json`.
    pub async fn export_enhanced(&self, basename: &str) -> Result<ExportArtifact> {
        let state = self.state.read().await;
        let enhanced = state
            .enhancement
            .value()
            .ok_or_else(|| RefinerError::validation("There is no enhanced prompt to export"))?;
        enhanced.to_artifact(basename)
    }

    async fn current_context(&self) -> Result<PromptContext> {
        self.state
            .read()
            .await
            .context
            .clone()
            .ok_or_else(|| RefinerError::validation("Analyze a prompt first"))
    }

    /// Explicit instructions win over the selected persona.
    async fn persona_instructions_for(&self, context: &PromptContext) -> Option<String> {
        match &context.persona_instructions {
            Some(instructions) => Some(instructions.clone()),
            None => self.personas.selected_instructions().await,
        }
    }

    async fn compose_persona(&self, mut context: PromptContext) -> PromptContext {
        context.persona_instructions = self.persona_instructions_for(&context).await;
        context
    }
}

fn normalize_analysis(raw: Generated<RawAnalysis>) -> Generated<AnalysisResult> {
    let Generated {
        value,
        mut coercions,
    } = raw;
    let normalized = value.normalize();
    coercions.extend(normalized.coercions);
    Generated::with_coercions(normalized.value, coercions)
}

fn require_suggestion(suggestion: &str) -> Result<String> {
    if suggestion.trim().is_empty() {
        return Err(RefinerError::validation("Suggestion text must not be empty"));
    }
    Ok(suggestion.to_string())
}

fn into_outcome<T>(generated: Generated<T>) -> Outcome<T> {
    for coercion in &generated.coercions {
        tracing::warn!(field = %coercion.field, detail = %coercion.detail, "Coerced gateway response");
    }
    let warnings = generated.coercions.into_iter().map(Warning::from).collect();
    Outcome::new(generated.value, warnings)
}
