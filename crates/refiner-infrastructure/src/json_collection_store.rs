//! File-backed collection store.
//!
//! Each collection is one JSON array in `<dir>/<storage key>.json`.

use crate::paths::RefinerPaths;
use crate::storage::AtomicJsonFile;
use refiner_core::error::{RefinerError, Result};
use refiner_core::store::{CollectionItem, CollectionStore};
use std::path::Path;
use std::sync::Arc;

/// Stores one collection as a single JSON blob.
///
/// A blob that fails to deserialize is treated as an empty collection.
pub struct JsonCollectionStore<T: CollectionItem> {
    file: Arc<AtomicJsonFile<Vec<T>>>,
}

impl<T: CollectionItem> JsonCollectionStore<T> {
    /// Creates a store for `T` inside `dir`, keyed by `T::STORAGE_KEY`.
    pub fn new(dir: &Path) -> Self {
        let path = RefinerPaths::collection_file(dir, T::STORAGE_KEY);
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[async_trait::async_trait]
impl<T: CollectionItem> CollectionStore<T> for JsonCollectionStore<T> {
    async fn load(&self) -> Result<Vec<T>> {
        let file = Arc::clone(&self.file);
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| RefinerError::internal(format!("Storage task failed: {e}")))?;

        match loaded {
            Ok(items) => Ok(items.unwrap_or_default()),
            Err(err) => {
                tracing::warn!(
                    collection = T::STORAGE_KEY,
                    error = %err,
                    "Stored collection is unreadable, treating it as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn save_all(&self, items: &[T]) -> Result<()> {
        let file = Arc::clone(&self.file);
        let items = items.to_vec();
        let count = items.len();
        tokio::task::spawn_blocking(move || file.save(&items))
            .await
            .map_err(|e| RefinerError::internal(format!("Storage task failed: {e}")))??;

        tracing::debug!(collection = T::STORAGE_KEY, count, "Saved collection");
        Ok(())
    }
}
