#![allow(dead_code)]

use async_trait::async_trait;
use refiner_application::RefinementSession;
use refiner_core::analysis::RawAnalysis;
use refiner_core::config::StorageConfig;
use refiner_core::context::PromptContext;
use refiner_core::error::{RefinerError, Result};
use refiner_core::gateway::{
    ApplySuggestionRequest, ChainStepOutput, ChainStepRequest, EnhanceRequest,
    ExplainSuggestionRequest, Gateway, SuggestionExplanation, SuggestionPreview,
};
use refiner_core::history::HistoryRecord;
use refiner_core::operation::OperationKind;
use refiner_core::output::{EnhancedPrompt, OutputFormat};
use refiner_core::persona::Persona;
use refiner_core::warning::Generated;
use refiner_infrastructure::MemoryCollectionStore;
use serde_json::json;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// A deterministic gateway that counts calls and records requests.
#[derive(Default)]
pub struct StubGateway {
    calls: AtomicUsize,
    calls_by_kind: Mutex<HashMap<OperationKind, usize>>,
    analysis: Mutex<Option<RawAnalysis>>,
    analysis_gates: Mutex<VecDeque<oneshot::Receiver<RawAnalysis>>>,
    failing: Mutex<HashSet<OperationKind>>,
    chain_outputs: Mutex<VecDeque<Result<String>>>,
    pub analyzed: Mutex<Vec<PromptContext>>,
    pub explained: Mutex<Vec<ExplainSuggestionRequest>>,
    pub enhanced: Mutex<Vec<EnhanceRequest>>,
    pub chain_inputs: Mutex<Vec<String>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `analyze` answer with the given wire-shaped JSON.
    pub fn with_analysis(self, raw: serde_json::Value) -> Self {
        *self.analysis.lock().unwrap() = Some(serde_json::from_value(raw).unwrap());
        self
    }

    /// The next `analyze` call waits for the returned sender.
    pub fn gate_next_analysis(&self) -> oneshot::Sender<RawAnalysis> {
        let (tx, rx) = oneshot::channel();
        self.analysis_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn fail(&self, kind: OperationKind) {
        self.failing.lock().unwrap().insert(kind);
    }

    pub fn recover(&self, kind: OperationKind) {
        self.failing.lock().unwrap().remove(&kind);
    }

    /// Queues answers for chain steps; unqueued steps echo their input.
    pub fn queue_chain_output(&self, output: Result<String>) {
        self.chain_outputs.lock().unwrap().push_back(output);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_of(&self, kind: OperationKind) -> usize {
        self.calls_by_kind
            .lock()
            .unwrap()
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    fn record(&self, kind: OperationKind) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.calls_by_kind.lock().unwrap().entry(kind).or_insert(0) += 1;
        if self.failing.lock().unwrap().contains(&kind) {
            return Err(RefinerError::generation(format!("{kind} backend unavailable")));
        }
        Ok(())
    }
}

pub fn analysis_json(suggestions: serde_json::Value) -> serde_json::Value {
    json!({
        "analysis": "The prompt is understandable but vague.",
        "suggestions": suggestions,
        "promptClarityScore": 6,
        "clarityScoreReasoning": "Goal is clear, details are missing.",
        "potentialAmbiguities": ["short"],
        "tokenCountEstimation": 12,
        "overallRating": "Good Start",
        "suggestedModel": "Google Gemini 2.5 Pro",
        "modelSuggestionReasoning": "General purpose task."
    })
}

pub fn default_analysis() -> RawAnalysis {
    serde_json::from_value(analysis_json(json!([
        "Specify the audience",
        "Define the output length",
        "Give an example"
    ])))
    .unwrap()
}

#[async_trait]
impl Gateway for StubGateway {
    async fn analyze(&self, context: &PromptContext) -> Result<Generated<RawAnalysis>> {
        self.record(OperationKind::Analyze)?;
        self.analyzed.lock().unwrap().push(context.clone());

        let gate = self.analysis_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let raw = gate
                .await
                .map_err(|_| RefinerError::generation("gate dropped"))?;
            return Ok(Generated::clean(raw));
        }

        let raw = self
            .analysis
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(default_analysis);
        Ok(Generated::clean(raw))
    }

    async fn apply_suggestion(
        &self,
        request: &ApplySuggestionRequest,
    ) -> Result<Generated<SuggestionPreview>> {
        self.record(OperationKind::ApplySuggestion)?;
        Ok(Generated::clean(SuggestionPreview {
            preview_text: format!("{} ({})", request.original_prompt, request.suggestion_to_apply),
        }))
    }

    async fn explain_suggestion(
        &self,
        request: &ExplainSuggestionRequest,
    ) -> Result<Generated<SuggestionExplanation>> {
        self.record(OperationKind::ExplainSuggestion)?;
        self.explained.lock().unwrap().push(request.clone());
        Ok(Generated::clean(SuggestionExplanation {
            explanation: format!(
                "'{}' removes guesswork from '{}'.",
                request.suggestion_to_explain, request.original_prompt
            ),
        }))
    }

    async fn enhance(&self, request: &EnhanceRequest) -> Result<Generated<EnhancedPrompt>> {
        self.record(OperationKind::Enhance)?;
        self.enhanced.lock().unwrap().push(request.clone());

        let enhanced_text = match request.format {
            OutputFormat::Json => json!({
                "task": request.original_prompt,
                "requirements": request.suggestions,
            })
            .to_string(),
            OutputFormat::Markdown => {
                let mut text = format!("# Task\n\n{}\n", request.original_prompt);
                if !request.suggestions.is_empty() {
                    text.push_str("\n## Requirements\n\n");
                    for suggestion in &request.suggestions {
                        text.push_str(&format!("- {suggestion}\n"));
                    }
                }
                text
            }
        };
        Ok(Generated::clean(EnhancedPrompt {
            enhanced_text,
            format: request.format,
        }))
    }

    async fn run_chain_step(&self, request: &ChainStepRequest) -> Result<Generated<ChainStepOutput>> {
        self.record(OperationKind::RunChainStep)?;
        self.chain_inputs.lock().unwrap().push(request.prompt_text.clone());

        let queued = self.chain_outputs.lock().unwrap().pop_front();
        let output_text = match queued {
            Some(output) => output?,
            None => format!("echo: {}", request.prompt_text),
        };
        Ok(Generated::clean(ChainStepOutput { output_text }))
    }
}

pub struct Harness {
    pub gateway: Arc<StubGateway>,
    pub history_store: Arc<MemoryCollectionStore<HistoryRecord>>,
    pub persona_store: Arc<MemoryCollectionStore<Persona>>,
    pub session: RefinementSession,
}

pub async fn harness_with(gateway: StubGateway) -> Harness {
    let gateway = Arc::new(gateway);
    let history_store = Arc::new(MemoryCollectionStore::<HistoryRecord>::new());
    let persona_store = Arc::new(MemoryCollectionStore::<Persona>::new());
    let session = RefinementSession::open(
        gateway.clone(),
        history_store.clone(),
        persona_store.clone(),
        &StorageConfig::default(),
    )
    .await
    .unwrap();

    Harness {
        gateway,
        history_store,
        persona_store,
        session,
    }
}

pub async fn harness() -> Harness {
    harness_with(StubGateway::new()).await
}
