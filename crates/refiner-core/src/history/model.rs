//! History record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::context::PromptContext;

/// A snapshot of one completed analysis.
///
/// Records are never edited; the history only grows, evicts, or is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub context: PromptContext,
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Creates a record stamped with the current time.
    pub fn new(context: PromptContext, result: AnalysisResult) -> Self {
        Self::at(context, result, Utc::now())
    }

    pub fn at(context: PromptContext, result: AnalysisResult, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            context,
            result,
            created_at,
        }
    }
}
