//! Bounded, newest-first analysis history.

use refiner_core::error::{RefinerError, Result};
use refiner_core::history::HistoryRecord;
use refiner_core::store::{CollectionItem, CollectionStore, bound_newest_first};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps the history in memory and rewrites the store on every change.
///
/// The in-memory list only changes once the store accepted the new list.
pub struct HistoryService {
    store: Arc<dyn CollectionStore<HistoryRecord>>,
    records: RwLock<Vec<HistoryRecord>>,
    capacity: usize,
}

impl HistoryService {
    /// Loads the stored history once.
    pub async fn load(store: Arc<dyn CollectionStore<HistoryRecord>>, capacity: usize) -> Result<Self> {
        let mut records = store.load().await?;
        bound_newest_first(&mut records, capacity);
        tracing::debug!(count = records.len(), capacity, "Loaded history");
        Ok(Self {
            store,
            records: RwLock::new(records),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepends `record`, evicting the oldest entries beyond capacity.
    pub async fn add(&self, record: HistoryRecord) -> Result<()> {
        let mut records = self.records.write().await;
        let mut updated = Vec::with_capacity(records.len() + 1);
        updated.push(record);
        updated.extend(records.iter().cloned());
        bound_newest_first(&mut updated, self.capacity);
        self.store.save_all(&updated).await?;
        *records = updated;
        Ok(())
    }

    /// All records, newest first.
    pub async fn records(&self) -> Vec<HistoryRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn find(&self, id: &str) -> Result<HistoryRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| RefinerError::not_found(HistoryRecord::ENTITY_NAME, id))
    }

    pub async fn clear(&self) -> Result<()> {
        let mut records = self.records.write().await;
        self.store.save_all(&[]).await?;
        records.clear();
        tracing::info!("Cleared history");
        Ok(())
    }
}
