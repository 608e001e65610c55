//! Configuration models.
//!
//! `config.toml` holds non-secret settings; API keys live in `secret.json`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumString};

use crate::store::{DEFAULT_HISTORY_CAPACITY, DEFAULT_PERSONA_CAPACITY};

/// Text-generation backend used by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAI,
}

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RefinerConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Overrides the backend's default model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// HTTP request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the collection files; defaults to the data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_persona_capacity")]
    pub persona_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            persona_capacity: DEFAULT_PERSONA_CAPACITY,
        }
    }
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_persona_capacity() -> usize {
    DEFAULT_PERSONA_CAPACITY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Append logs to this file instead of stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Root structure of `secret.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<ApiKeyConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<ApiKeyConfig>,
}

/// API key plus optional model for one backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl SecretConfig {
    pub fn for_backend(&self, backend: BackendKind) -> Option<&ApiKeyConfig> {
        let entry = match backend {
            BackendKind::Gemini => self.gemini.as_ref(),
            BackendKind::OpenAI => self.openai.as_ref(),
        };
        entry.filter(|config| !config.api_key.trim().is_empty())
    }
}
