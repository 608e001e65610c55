//! `config.toml` storage.

use crate::logging::validate_level;
use crate::paths::RefinerPaths;
use refiner_core::config::RefinerConfig;
use refiner_core::error::Result;
use std::fs;
use std::path::PathBuf;

/// Loads and saves [`RefinerConfig`] as TOML.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Storage at the default `config.toml` location.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: RefinerPaths::config_file()?,
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the config; a missing or empty file yields the defaults.
    ///
    /// An unparsable `logging.level` is rejected here rather than silently
    /// replaced when logging is installed.
    pub fn load(&self) -> Result<RefinerConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "config.toml not found, using defaults");
            return Ok(RefinerConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(RefinerConfig::default());
        }
        let config: RefinerConfig = toml::from_str(&content)?;
        validate_level(&config.logging.level)?;
        Ok(config)
    }

    pub fn save(&self, config: &RefinerConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(config)?)?;
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refiner_core::config::BackendKind;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(storage.load().unwrap(), RefinerConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("nested").join("config.toml"));

        let mut config = RefinerConfig::default();
        config.gateway.backend = BackendKind::OpenAI;
        config.storage.history_capacity = 3;
        storage.save(&config).unwrap();

        assert_eq!(storage.load().unwrap(), config);
    }

    #[test]
    fn test_invalid_log_level_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[logging]\nlevel = \"refiner_core=loud\"\n").unwrap();
        let err = ConfigStorage::with_path(path).load().unwrap_err();
        assert!(matches!(err, refiner_core::RefinerError::Config(_)));
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[gateway\nbackend = ").unwrap();
        let err = ConfigStorage::with_path(path).load().unwrap_err();
        assert!(matches!(err, refiner_core::RefinerError::Serialization { .. }));
    }
}
