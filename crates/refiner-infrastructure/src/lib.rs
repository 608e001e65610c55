//! Storage, configuration and logging for the prompt refiner.
//!
//! Collections are persisted as JSON blobs under fixed keys, configuration
//! lives in `config.toml` and API keys in `secret.json`.

pub mod export;
pub mod json_collection_store;
pub mod logging;
pub mod memory_collection_store;
pub mod paths;
pub mod storage;

pub use export::write_artifact;
pub use json_collection_store::JsonCollectionStore;
pub use logging::init_tracing;
pub use memory_collection_store::MemoryCollectionStore;
pub use paths::RefinerPaths;
pub use storage::{ConfigStorage, SecretStorage};
