//! Builds the configured gateway.

use crate::backends::gemini::DEFAULT_GEMINI_MODEL;
use crate::backends::openai::DEFAULT_OPENAI_MODEL;
use crate::backends::{GeminiBackend, OpenAIBackend};
use crate::template_gateway::TemplateGateway;
use refiner_core::config::{ApiKeyConfig, BackendKind, GatewayConfig};
use refiner_core::error::Result;
use refiner_core::gateway::Gateway;
use refiner_infrastructure::storage::SecretStorage;
use std::sync::Arc;
use std::time::Duration;

/// Creates the gateway selected by `config`, resolving the API key through
/// `secrets` (file first, then environment).
pub fn build_gateway(config: &GatewayConfig, secrets: &SecretStorage) -> Result<Arc<dyn Gateway>> {
    let key = secrets.resolve(config.backend)?;
    build_gateway_with_key(config, key)
}

/// Creates the gateway from an already resolved key.
///
/// The model is taken from `config`, then from the key entry, then the
/// backend default.
pub fn build_gateway_with_key(config: &GatewayConfig, key: ApiKeyConfig) -> Result<Arc<dyn Gateway>> {
    let timeout = config.timeout_secs.map(Duration::from_secs);
    let model = config.model_name.clone().or(key.model_name);

    let gateway: Arc<dyn Gateway> = match config.backend {
        BackendKind::Gemini => {
            let model = model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
            tracing::info!(backend = "gemini", %model, "Using Gemini backend");
            let mut backend = GeminiBackend::new(key.api_key, model);
            if let Some(timeout) = timeout {
                backend = backend.with_timeout(timeout)?;
            }
            Arc::new(TemplateGateway::new(backend)?)
        }
        BackendKind::OpenAI => {
            let model = model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
            tracing::info!(backend = "openai", %model, "Using OpenAI backend");
            let mut backend = OpenAIBackend::new(key.api_key, model);
            if let Some(timeout) = timeout {
                backend = backend.with_timeout(timeout)?;
            }
            Arc::new(TemplateGateway::new(backend)?)
        }
    };
    Ok(gateway)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_from_secret_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, r#"{"openai":{"api_key":"sk-test"}}"#).unwrap();

        let config = GatewayConfig {
            backend: BackendKind::OpenAI,
            model_name: Some("gpt-4.1".into()),
            timeout_secs: Some(30),
        };
        assert!(build_gateway(&config, &SecretStorage::with_path(path)).is_ok());
    }

    #[test]
    fn test_build_with_key_defaults() {
        let key = ApiKeyConfig {
            api_key: "k".into(),
            model_name: None,
        };
        assert!(build_gateway_with_key(&GatewayConfig::default(), key).is_ok());
    }
}
