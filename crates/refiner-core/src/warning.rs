//! Non-fatal conditions reported alongside successful results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A response was accepted after being normalized into the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCoercion {
    /// Wire name of the coerced field (e.g. `suggestions`).
    pub field: String,
    /// What was received and what it became.
    pub detail: String,
}

impl ShapeCoercion {
    pub fn new(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ShapeCoercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coerced '{}': {}", self.field, self.detail)
    }
}

/// A non-fatal condition raised while serving an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    /// The gateway response had to be coerced.
    ShapeCoercion(ShapeCoercion),
    /// The image reference was not a recognizable encoding and was not sent.
    ImageReferenceDropped { reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ShapeCoercion(coercion) => write!(f, "{coercion}"),
            Warning::ImageReferenceDropped { reason } => {
                write!(f, "image reference dropped: {reason}")
            }
        }
    }
}

impl From<ShapeCoercion> for Warning {
    fn from(coercion: ShapeCoercion) -> Self {
        Warning::ShapeCoercion(coercion)
    }
}

/// A gateway result together with the coercions applied to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub value: T,
    pub coercions: Vec<ShapeCoercion>,
}

impl<T> Generated<T> {
    /// A result that needed no coercion.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            coercions: Vec::new(),
        }
    }

    pub fn with_coercions(value: T, coercions: Vec<ShapeCoercion>) -> Self {
        Self { value, coercions }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generated<U> {
        Generated {
            value: f(self.value),
            coercions: self.coercions,
        }
    }
}

impl<T> From<T> for Generated<T> {
    fn from(value: T) -> Self {
        Self::clean(value)
    }
}

/// A successful orchestrated result plus any warnings raised along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    pub fn new(value: T, warnings: Vec<Warning>) -> Self {
        Self { value, warnings }
    }

    pub fn has_coercions(&self) -> bool {
        self.warnings
            .iter()
            .any(|warning| matches!(warning, Warning::ShapeCoercion(_)))
    }
}
