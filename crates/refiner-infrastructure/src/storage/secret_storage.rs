//! Secret configuration file storage.
//!
//! Loads API keys from `secret.json`, falling back to environment variables.

use crate::paths::RefinerPaths;
use refiner_core::config::{ApiKeyConfig, BackendKind, SecretConfig};
use std::fs;
use std::path::PathBuf;

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
    /// No key for the requested backend in the file or the environment.
    MissingKey(BackendKind),
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            SecretStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
            SecretStorageError::MissingKey(backend) => write!(
                f,
                "No API key for '{backend}' in secret.json or {}",
                env_key_var(*backend)
            ),
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

impl From<SecretStorageError> for refiner_core::RefinerError {
    fn from(e: SecretStorageError) -> Self {
        refiner_core::RefinerError::config(e.to_string())
    }
}

/// Environment variable holding the API key of a backend.
pub fn env_key_var(backend: BackendKind) -> &'static str {
    match backend {
        BackendKind::Gemini => "GEMINI_API_KEY",
        BackendKind::OpenAI => "OPENAI_API_KEY",
    }
}

/// Environment variable holding the model name of a backend.
pub fn env_model_var(backend: BackendKind) -> &'static str {
    match backend {
        BackendKind::Gemini => "GEMINI_MODEL_NAME",
        BackendKind::OpenAI => "OPENAI_MODEL_NAME",
    }
}

/// Read-only storage for `secret.json`.
///
/// The file is plaintext JSON; keep its permissions restricted.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a storage pointing at the default `secret.json`.
    pub fn new() -> Result<Self, SecretStorageError> {
        let path = RefinerPaths::secret_file().map_err(|_| SecretStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secret configuration; a missing file yields an empty config.
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Ok(SecretConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(SecretConfig::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Resolves the key for `backend`.
    ///
    /// Priority: `secret.json`, then environment variables.
    pub fn resolve(&self, backend: BackendKind) -> Result<ApiKeyConfig, SecretStorageError> {
        let secrets = self.load()?;
        if let Some(config) = secrets.for_backend(backend) {
            return Ok(config.clone());
        }
        resolve_from_env(backend, |name| std::env::var(name).ok())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

fn resolve_from_env(
    backend: BackendKind,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ApiKeyConfig, SecretStorageError> {
    let api_key = lookup(env_key_var(backend))
        .filter(|key| !key.trim().is_empty())
        .ok_or(SecretStorageError::MissingKey(backend))?;
    Ok(ApiKeyConfig {
        api_key,
        model_name: lookup(env_model_var(backend)),
    })
}
