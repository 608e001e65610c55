//! Unified path management for refiner configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/prompt-refiner/        # Config directory
//! ├── config.toml                  # Application configuration
//! └── secret.json                  # API keys
//!
//! ~/.local/share/prompt-refiner/   # Data directory
//! ├── promptRefinerHistory.json    # Analysis history (newest-first)
//! └── promptRefinerPersonas.json   # Personas (newest-first)
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "prompt-refiner";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for refiner_core::RefinerError {
    fn from(e: PathError) -> Self {
        refiner_core::RefinerError::config(e.to_string())
    }
}

/// Platform paths for the refiner (XDG on Linux, native elsewhere).
pub struct RefinerPaths;

impl RefinerPaths {
    /// Returns the refiner configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the refiner data directory.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to `secret.json`.
    ///
    /// # Security Note
    ///
    /// The file should only be readable by its owner (e.g. mode 600).
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Path of the JSON blob stored under `key` in `dir`.
    pub fn collection_file(dir: &std::path::Path, key: &str) -> PathBuf {
        dir.join(format!("{key}.json"))
    }
}
