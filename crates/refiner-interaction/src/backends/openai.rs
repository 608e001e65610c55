//! OpenAI Chat Completions backend.

use super::gemini::is_retryable;
use super::{GenerationInput, TextBackend};
use refiner_core::error::{RefinerError, Result};
use refiner_core::error_message::{ErrorPayload, to_error_message};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Backend that talks to the OpenAI Chat Completions API.
#[derive(Clone)]
pub struct OpenAIBackend {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAIBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Replaces the HTTP client with one that times out after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RefinerError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, input: &GenerationInput) -> ChatCompletionRequest {
        let mut content = vec![MessageContent::Text {
            text: input.prompt.clone(),
        }];
        if let Some(image) = &input.image {
            content.push(MessageContent::ImageUrl {
                image_url: ImageUrl {
                    url: image.to_data_uri(),
                },
            });
        }

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(BASE_URL)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                RefinerError::generation(format!(
                    "OpenAI API request failed: {}",
                    to_error_message(ErrorPayload::Native(&err))
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| RefinerError::generation(format!("Failed to parse OpenAI response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait::async_trait]
impl TextBackend for OpenAIBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, input: &GenerationInput) -> Result<String> {
        let request = self.build_request(input);
        tracing::debug!(model = %self.model, has_image = input.image.is_some(), "Sending OpenAI request");
        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<MessageContent>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MessageContent {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| RefinerError::generation("OpenAI API returned no content in the response"))
}

fn map_http_error(status: StatusCode, body: &str) -> RefinerError {
    let retryable = is_retryable(status);
    tracing::warn!(status = status.as_u16(), retryable, "OpenAI API returned an error");
    RefinerError::generation(format!(
        "OpenAI API error ({}): {}",
        status.as_u16(),
        to_error_message(ErrorPayload::Text(body))
    ))
}
