//! Persona domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-defined persona.
///
/// Personas are value-immutable: editing means deleting and recreating.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Unique identifier (UUID format)
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description shown in pickers
    pub description: String,
    /// Instructions passed to the backend while the persona is selected
    pub instructions: String,
    /// Optional example prompts or answers illustrating the persona
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    /// Creation time; collections are ordered newest-first by this field
    pub created_at: DateTime<Utc>,
}

impl Persona {
    /// Text sent as `personaInstructions`.
    ///
    /// Examples, when present, are appended in their own delimited block.
    pub fn prompt_instructions(&self) -> String {
        match self.examples.as_deref().map(str::trim) {
            Some(examples) if !examples.is_empty() => format!(
                "{}\n\nExamples:\n---\n{}\n---",
                self.instructions.trim(),
                examples
            ),
            _ => self.instructions.trim().to_string(),
        }
    }
}
