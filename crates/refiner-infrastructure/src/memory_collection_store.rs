//! In-memory collection store.

use refiner_core::error::Result;
use refiner_core::store::{CollectionItem, CollectionStore};
use tokio::sync::RwLock;

/// Keeps a collection in memory only.
///
/// Used when no data directory is available and in tests.
pub struct MemoryCollectionStore<T: CollectionItem> {
    items: RwLock<Vec<T>>,
}

impl<T: CollectionItem> MemoryCollectionStore<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Creates a store that already holds `items`.
    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }
}

impl<T: CollectionItem> Default for MemoryCollectionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<T: CollectionItem> CollectionStore<T> for MemoryCollectionStore<T> {
    async fn load(&self) -> Result<Vec<T>> {
        Ok(self.items.read().await.clone())
    }

    async fn save_all(&self, items: &[T]) -> Result<()> {
        *self.items.write().await = items.to_vec();
        Ok(())
    }
}
