//! Two-step prompt chain substitution.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

/// Token in the step-2 template that is replaced with step 1's output.
///
/// The triple-brace spelling `{{{step1Output}}}` is accepted as well.
pub const STEP1_OUTPUT_PLACEHOLDER: &str = "{{step1Output}}";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\{step1Output\}\}\}|\{\{step1Output\}\}")
        .expect("placeholder pattern is valid")
});

/// Replaces every occurrence of [`STEP1_OUTPUT_PLACEHOLDER`] in `template`.
///
/// The output is inserted literally, in a single pass. A template without
/// the placeholder is returned unchanged.
pub fn substitute_step1_output(template: &str, step1_output: &str) -> String {
    PLACEHOLDER
        .replace_all(template, NoExpand(step1_output))
        .into_owned()
}

/// Both outputs of a completed two-step chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRun {
    pub step1_output: String,
    /// The step-2 prompt after substitution, exactly as dispatched.
    pub step2_prompt: String,
    pub final_output: String,
}
