//! Error types for the prompt refiner.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operation::OperationKind;

/// A shared error type for the whole refiner workspace.
///
/// `Validation` and `Generation` are the two errors a caller is expected to
/// show to the user. The remaining variants come from the storage and
/// configuration layers.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RefinerError {
    /// Caller-correctable input problem, detected before any gateway call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The generation backend failed or returned something unusable.
    #[error("Generation error: {0}")]
    Generation(String),

    /// A newer request of the same kind was issued while this one was in flight.
    #[error("{operation} request was superseded by a newer request")]
    Superseded { operation: OperationKind },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RefinerError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_))
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for RefinerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for RefinerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RefinerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for RefinerError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, RefinerError>`.
pub type Result<T> = std::result::Result<T, RefinerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_and_predicates() {
        assert!(RefinerError::validation("empty").is_validation());
        assert!(RefinerError::generation("down").is_generation());
        assert!(RefinerError::not_found("persona", "p-1").is_not_found());
        assert!(
            RefinerError::Superseded {
                operation: OperationKind::Enhance
            }
            .is_superseded()
        );
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let err: RefinerError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        match err {
            RefinerError::Io { message } => assert!(message.contains("PermissionDenied")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        let err = RefinerError::Superseded {
            operation: OperationKind::Analyze,
        };
        assert_eq!(
            err.to_string(),
            "analyze request was superseded by a newer request"
        );
    }
}
