//! Writes export artifacts to disk.

use refiner_core::error::{RefinerError, Result};
use refiner_core::output::ExportArtifact;
use std::path::{Path, PathBuf};

/// Writes `artifact` into `dir` under its file name and returns the path.
///
/// The content is written byte-for-byte; an existing file is replaced.
pub async fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf> {
    if !dir.is_dir() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| RefinerError::io(format!("Cannot create {}: {e}", dir.display())))?;
    }

    let path = dir.join(&artifact.file_name);
    tokio::fs::write(&path, artifact.content.as_bytes()).await?;

    tracing::info!(path = %path.display(), mime_type = %artifact.mime_type, "Exported prompt");
    Ok(path)
}
