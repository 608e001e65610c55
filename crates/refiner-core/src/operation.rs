//! Operation kinds exposed by the generation gateway.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// One of the five request/response shapes the gateway supports.
///
/// The orchestrator keeps one state machine per kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    Analyze,
    ApplySuggestion,
    ExplainSuggestion,
    Enhance,
    RunChainStep,
}
