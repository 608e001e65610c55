//! File-backed storage primitives.

pub mod atomic_json;
pub mod config_storage;
pub mod secret_storage;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use config_storage::ConfigStorage;
pub use secret_storage::{SecretStorage, SecretStorageError, env_key_var, env_model_var};
