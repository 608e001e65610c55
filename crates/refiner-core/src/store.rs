//! Collection store interface for history and personas.
//!
//! Each collection is persisted as one JSON array under a fixed key and is
//! rewritten in full on every mutation. Implementations live in the
//! infrastructure crate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::history::HistoryRecord;
use crate::persona::Persona;

/// Storage key of the analysis history collection.
pub const HISTORY_STORAGE_KEY: &str = "promptRefinerHistory";

/// Storage key of the persona collection.
pub const PERSONAS_STORAGE_KEY: &str = "promptRefinerPersonas";

/// Default maximum number of history records kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Default maximum number of personas kept.
pub const DEFAULT_PERSONA_CAPACITY: usize = 50;

/// An item that can live in a bounded, newest-first collection.
pub trait CollectionItem: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Storage key of the collection this item belongs to.
    const STORAGE_KEY: &'static str;
    /// Entity name used in errors and logs.
    const ENTITY_NAME: &'static str;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

impl CollectionItem for HistoryRecord {
    const STORAGE_KEY: &'static str = HISTORY_STORAGE_KEY;
    const ENTITY_NAME: &'static str = "history record";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl CollectionItem for Persona {
    const STORAGE_KEY: &'static str = PERSONAS_STORAGE_KEY;
    const ENTITY_NAME: &'static str = "persona";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// An externally owned key-value resource holding one collection.
///
/// `load` returns an empty list when nothing is stored or the stored blob
/// cannot be deserialized.
#[async_trait::async_trait]
pub trait CollectionStore<T: CollectionItem>: Send + Sync {
    /// Loads the whole collection.
    async fn load(&self) -> Result<Vec<T>>;

    /// Replaces the whole collection.
    async fn save_all(&self, items: &[T]) -> Result<()>;
}

/// Orders items newest-first and drops everything beyond `capacity`.
///
/// The sort is stable, so items sharing a timestamp keep their relative order.
pub fn bound_newest_first<T: CollectionItem>(items: &mut Vec<T>, capacity: usize) {
    items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    items.truncate(capacity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::context::PromptContext;
    use chrono::Duration;

    fn record(offset_secs: i64) -> HistoryRecord {
        let base = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        HistoryRecord::at(
            PromptContext::new(format!("prompt {offset_secs}")),
            AnalysisResult::default(),
            base + Duration::seconds(offset_secs),
        )
    }

    #[test]
    fn test_bound_sorts_newest_first() {
        let mut items = vec![record(1), record(3), record(2)];
        bound_newest_first(&mut items, 10);
        let texts: Vec<&str> = items.iter().map(|r| r.context.text.as_str()).collect();
        assert_eq!(texts, vec!["prompt 3", "prompt 2", "prompt 1"]);
    }

    #[test]
    fn test_bound_truncates_oldest() {
        let mut items: Vec<HistoryRecord> = (0..5).map(record).collect();
        bound_newest_first(&mut items, 3);
        assert_eq!(items.len(), 3);
        assert_eq!(items.last().unwrap().context.text, "prompt 2");
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(HistoryRecord::STORAGE_KEY, "promptRefinerHistory");
        assert_eq!(Persona::STORAGE_KEY, "promptRefinerPersonas");
    }
}
