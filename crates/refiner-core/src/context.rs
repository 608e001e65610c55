//! The prompt and the optional context a user submits for refinement.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{RefinerError, Result};
use crate::warning::Warning;

/// The kind of model a prompt is written for.
///
/// The lowercase spellings are part of the gateway wire contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelClass {
    General,
    Code,
    Creative,
    Image,
    Research,
}

static DATA_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:([A-Za-z0-9][A-Za-z0-9.+-]*/[A-Za-z0-9][A-Za-z0-9.+-]*);base64,(.+)$")
        .expect("data URI pattern is valid")
});

/// A validated `data:<mime>;base64,<payload>` image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    mime_type: String,
    data: String,
}

impl ImageReference {
    /// Parses a data URI, rejecting anything that is not base64 encoded media.
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        let captures = DATA_URI
            .captures(raw.trim())
            .ok_or_else(|| "expected a 'data:<mime>;base64,<payload>' URI".to_string())?;
        let mime_type = captures[1].to_ascii_lowercase();
        let data = captures[2].to_string();

        BASE64_STANDARD
            .decode(data.as_bytes())
            .map_err(|err| format!("payload is not valid base64: {err}"))?;

        Ok(Self { mime_type, data })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload, without the `data:` prefix.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Re-assembles the data URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// A prompt plus the optional context that shapes how it is analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptContext {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_model_class: Option<ModelClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_research: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_instructions: Option<String>,
}

impl PromptContext {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_model_class(mut self, class: ModelClass) -> Self {
        self.target_model_class = Some(class);
        self
    }

    pub fn with_deep_research(mut self, deep_research: bool) -> Self {
        self.deep_research = Some(deep_research);
        self
    }

    pub fn with_image_reference(mut self, image: impl Into<String>) -> Self {
        self.image_reference = Some(image.into());
        self
    }

    pub fn with_persona_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.persona_instructions = Some(instructions.into());
        self
    }

    /// Validates the context before it is dispatched.
    ///
    /// Blank text is a hard [`RefinerError::Validation`]. An image reference
    /// that is not a recognizable data URI is removed and reported as a
    /// [`Warning::ImageReferenceDropped`].
    pub fn validated(mut self) -> Result<(Self, Vec<Warning>)> {
        if self.text.trim().is_empty() {
            return Err(RefinerError::validation("Prompt text must not be empty"));
        }

        let mut warnings = Vec::new();
        if let Some(raw) = self.image_reference.take() {
            match ImageReference::parse(&raw) {
                Ok(_) => self.image_reference = Some(raw),
                Err(reason) => {
                    tracing::warn!(%reason, "Dropping unrecognized image reference");
                    warnings.push(Warning::ImageReferenceDropped { reason });
                }
            }
        }

        if matches!(self.persona_instructions.as_deref(), Some(text) if text.trim().is_empty()) {
            self.persona_instructions = None;
        }

        Ok((self, warnings))
    }

    /// The parsed image reference, if one is present and valid.
    pub fn image(&self) -> Option<ImageReference> {
        self.image_reference
            .as_deref()
            .and_then(|raw| ImageReference::parse(raw).ok())
    }
}
