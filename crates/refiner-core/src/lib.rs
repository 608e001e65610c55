//! Domain layer of the prompt refiner.
//!
//! Holds the data model, the [`gateway::Gateway`] and [`store::CollectionStore`]
//! interfaces, response coercion, and the shared [`RefinerError`] type.

pub mod analysis;
pub mod chain;
pub mod config;
pub mod context;
pub mod error;
pub mod error_message;
pub mod gateway;
pub mod history;
pub mod operation;
pub mod output;
pub mod persona;
pub mod store;
pub mod template;
pub mod warning;

pub use error::{RefinerError, Result};
pub use operation::OperationKind;
