//! Wires configuration, storage and the gateway into a session.

use crate::refinement_session::RefinementSession;
use refiner_core::config::RefinerConfig;
use refiner_core::error::Result;
use refiner_core::history::HistoryRecord;
use refiner_core::persona::Persona;
use refiner_infrastructure::storage::{ConfigStorage, SecretStorage};
use refiner_infrastructure::{JsonCollectionStore, RefinerPaths, init_tracing};
use refiner_interaction::build_gateway;
use std::sync::Arc;

/// Opens a session with file-backed collections in the configured
/// directory (the platform data directory by default).
pub async fn open_session(config: &RefinerConfig, secrets: &SecretStorage) -> Result<RefinementSession> {
    let gateway = build_gateway(&config.gateway, secrets)?;
    let dir = match &config.storage.dir {
        Some(dir) => dir.clone(),
        None => RefinerPaths::data_dir()?,
    };
    tracing::info!(dir = %dir.display(), "Opening refinement session");

    let history_store = Arc::new(JsonCollectionStore::<HistoryRecord>::new(&dir));
    let persona_store = Arc::new(JsonCollectionStore::<Persona>::new(&dir));
    RefinementSession::open(gateway, history_store, persona_store, &config.storage).await
}

/// Loads `config.toml` and `secret.json` from their default locations,
/// installs logging and opens a session.
pub async fn open_default_session() -> Result<RefinementSession> {
    let config = ConfigStorage::new()?.load()?;
    init_tracing(&config.logging)?;
    let secrets = SecretStorage::new()?;
    open_session(&config, &secrets).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use refiner_core::config::BackendKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_session_with_storage_dir() {
        let temp_dir = TempDir::new().unwrap();
        let secret_path = temp_dir.path().join("secret.json");
        std::fs::write(&secret_path, r#"{"gemini":{"api_key":"test-key"}}"#).unwrap();

        let mut config = RefinerConfig::default();
        config.gateway.backend = BackendKind::Gemini;
        config.storage.dir = Some(temp_dir.path().join("data"));

        let session = open_session(&config, &SecretStorage::with_path(secret_path))
            .await
            .unwrap();
        assert!(session.history().is_empty().await);
        assert!(session.personas().list().await.is_empty());
    }
}
