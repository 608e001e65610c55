//! Generation gateway backed by LLM REST APIs.
//!
//! [`TemplateGateway`] renders one prompt per operation, sends it to a
//! [`TextBackend`] and parses the answer. [`build_gateway`] wires up the
//! backend selected in `config.toml`.

pub mod backends;
pub mod factory;
pub mod prompts;
pub mod response;
pub mod template_gateway;

pub use backends::{GeminiBackend, GenerationInput, OpenAIBackend, TextBackend};
pub use factory::{build_gateway, build_gateway_with_key};
pub use prompts::PromptRenderer;
pub use template_gateway::TemplateGateway;
