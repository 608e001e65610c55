//! The single state container of a refinement session.

use crate::operation_state::OperationSlot;
use refiner_core::analysis::AnalysisResult;
use refiner_core::chain::ChainRun;
use refiner_core::context::PromptContext;
use refiner_core::error::{RefinerError, Result};
use refiner_core::gateway::{SuggestionExplanation, SuggestionPreview};
use refiner_core::operation::OperationKind;
use refiner_core::output::EnhancedPrompt;

/// Everything a session shows: the analyzed prompt, one slot per
/// operation and the per-suggestion inclusion flags.
#[derive(Debug, Clone)]
pub struct RefinementState {
    pub(crate) context: Option<PromptContext>,
    pub(crate) analysis: OperationSlot<AnalysisResult>,
    /// Parallel to the analysis suggestions.
    pub(crate) included: Vec<bool>,
    pub(crate) preview: OperationSlot<SuggestionPreview>,
    pub(crate) explanation: OperationSlot<SuggestionExplanation>,
    pub(crate) enhancement: OperationSlot<EnhancedPrompt>,
    pub(crate) chain: OperationSlot<ChainRun>,
    pub(crate) chain_step1_output: Option<String>,
}

impl Default for RefinementState {
    fn default() -> Self {
        Self {
            context: None,
            analysis: OperationSlot::new(OperationKind::Analyze),
            included: Vec::new(),
            preview: OperationSlot::new(OperationKind::ApplySuggestion),
            explanation: OperationSlot::new(OperationKind::ExplainSuggestion),
            enhancement: OperationSlot::new(OperationKind::Enhance),
            chain: OperationSlot::new(OperationKind::RunChainStep),
            chain_step1_output: None,
        }
    }
}

impl RefinementState {
    /// The prompt most recently submitted for analysis.
    pub fn context(&self) -> Option<&PromptContext> {
        self.context.as_ref()
    }

    pub fn analysis(&self) -> &OperationSlot<AnalysisResult> {
        &self.analysis
    }

    pub fn preview(&self) -> &OperationSlot<SuggestionPreview> {
        &self.preview
    }

    pub fn explanation(&self) -> &OperationSlot<SuggestionExplanation> {
        &self.explanation
    }

    pub fn enhancement(&self) -> &OperationSlot<EnhancedPrompt> {
        &self.enhancement
    }

    pub fn chain(&self) -> &OperationSlot<ChainRun> {
        &self.chain
    }

    /// Step 1 output of the latest chain run, kept even if step 2 failed.
    pub fn chain_step1_output(&self) -> Option<&str> {
        self.chain_step1_output.as_deref()
    }

    pub fn suggestions(&self) -> &[String] {
        self.analysis
            .value()
            .map(|analysis| analysis.suggestions.as_slice())
            .unwrap_or_default()
    }

    pub fn is_included(&self, index: usize) -> bool {
        self.included.get(index).copied().unwrap_or(false)
    }

    /// Suggestions still marked for enhancement, in display order.
    pub fn included_suggestions(&self) -> Vec<String> {
        self.suggestions()
            .iter()
            .enumerate()
            .filter(|(index, _)| self.is_included(*index))
            .map(|(_, suggestion)| suggestion.clone())
            .collect()
    }

    /// Installs a fresh analysis with every suggestion included.
    pub(crate) fn include_all(&mut self) {
        self.included = vec![true; self.suggestions().len()];
    }

    pub(crate) fn set_included(&mut self, index: usize, included: bool) -> Result<()> {
        let flag = self
            .included
            .get_mut(index)
            .ok_or_else(|| RefinerError::not_found("suggestion", index.to_string()))?;
        *flag = included;
        Ok(())
    }

    pub(crate) fn toggle_included(&mut self, index: usize) -> Result<bool> {
        let included = !self.is_included(index);
        self.set_included(index, included)?;
        Ok(included)
    }

    /// Clears everything derived from the previous analysis.
    pub(crate) fn reset_derived(&mut self) {
        self.preview.reset();
        self.explanation.reset();
        self.enhancement.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzed(suggestions: &[&str]) -> RefinementState {
        let mut state = RefinementState::default();
        state.analysis.restore(AnalysisResult {
            narrative: "ok".into(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            ..AnalysisResult::default()
        });
        state.include_all();
        state
    }

    #[test]
    fn test_include_all_after_analysis() {
        let state = analyzed(&["a", "b", "c"]);
        assert_eq!(state.included_suggestions(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_toggle_and_set() {
        let mut state = analyzed(&["a", "b", "c"]);
        assert!(!state.toggle_included(1).unwrap());
        state.set_included(2, false).unwrap();
        assert_eq!(state.included_suggestions(), vec!["a"]);
        assert!(state.toggle_included(1).unwrap());
        assert_eq!(state.included_suggestions(), vec!["a", "b"]);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut state = analyzed(&["a"]);
        assert!(state.toggle_included(5).unwrap_err().is_not_found());
        assert!(!state.is_included(5));
    }

    #[test]
    fn test_duplicate_suggestions_have_independent_flags() {
        let mut state = analyzed(&["same", "same"]);
        state.set_included(0, false).unwrap();
        assert_eq!(state.included_suggestions(), vec!["same"]);
    }

    #[test]
    fn test_no_analysis_means_no_suggestions() {
        let state = RefinementState::default();
        assert!(state.suggestions().is_empty());
        assert!(state.included_suggestions().is_empty());
    }
}
