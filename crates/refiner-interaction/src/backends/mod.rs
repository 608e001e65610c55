//! Text generation backends.

pub mod gemini;
pub mod openai;

pub use gemini::GeminiBackend;
pub use openai::OpenAIBackend;

use refiner_core::context::ImageReference;
use refiner_core::error::Result;

/// One rendered prompt plus an optional image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInput {
    pub prompt: String,
    pub image: Option<ImageReference>,
}

impl GenerationInput {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: Option<ImageReference>) -> Self {
        self.image = image;
        self
    }
}

/// A model that turns a prompt into text.
///
/// Failures are reported as [`refiner_core::RefinerError::Generation`].
#[async_trait::async_trait]
pub trait TextBackend: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    async fn generate(&self, input: &GenerationInput) -> Result<String>;
}
