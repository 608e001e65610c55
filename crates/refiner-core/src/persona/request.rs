//! Persona creation request model.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Persona;
use crate::error::{RefinerError, Result};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;
const DESCRIPTION_MIN: usize = 5;
const DESCRIPTION_MAX: usize = 200;
const INSTRUCTIONS_MIN: usize = 10;
const INSTRUCTIONS_MAX: usize = 2000;
const EXAMPLES_MAX: usize = 5000;

/// Request to create a new persona.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonaRequest {
    /// Display name (2-50 characters)
    pub name: String,

    /// Short description (5-200 characters)
    pub description: String,

    /// Instructions for the backend (10-2000 characters)
    pub instructions: String,

    /// Optional examples (at most 5000 characters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
}

impl CreatePersonaRequest {
    /// Validate the request.
    pub fn validate(&self) -> Result<()> {
        check_length("Name", &self.name, NAME_MIN, NAME_MAX)?;
        check_length("Description", &self.description, DESCRIPTION_MIN, DESCRIPTION_MAX)?;
        check_length("Instructions", &self.instructions, INSTRUCTIONS_MIN, INSTRUCTIONS_MAX)?;

        if let Some(examples) = &self.examples {
            if examples.trim().chars().count() > EXAMPLES_MAX {
                return Err(RefinerError::validation(format!(
                    "Examples must not exceed {EXAMPLES_MAX} characters"
                )));
            }
        }

        Ok(())
    }

    /// Convert this request into a Persona with a fresh UUID and timestamp.
    pub fn into_persona(self) -> Persona {
        let examples = self
            .examples
            .map(|examples| examples.trim().to_string())
            .filter(|examples| !examples.is_empty());

        Persona {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            instructions: self.instructions.trim().to_string(),
            examples,
            created_at: Utc::now(),
        }
    }
}

fn check_length(label: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let length = value.trim().chars().count();
    if length < min {
        return Err(RefinerError::validation(format!(
            "{label} must be at least {min} characters long"
        )));
    }
    if length > max {
        return Err(RefinerError::validation(format!(
            "{label} must not exceed {max} characters"
        )));
    }
    Ok(())
}
