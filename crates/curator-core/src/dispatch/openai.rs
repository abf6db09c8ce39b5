//! OpenAI-compatible backend using the Chat Completions API.
//!
//! Sends the image via data URL in the user message content array.

use super::backend::{CompletionRequest, VisionBackend};
use crate::error::{CurationError, CurationResult};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Backend for OpenAI-style chat-completions endpoints.
pub struct OpenAiBackend {
    api_key: String,
    model: String,
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl OpenAiBackend {
    pub fn new(api_key: &str, model: &str, endpoint: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            timeout,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

/// Pull the first choice's message content out of a chat-completions
/// response body.
///
/// Anything that lacks that path (an error object, an empty choices
/// array) is treated as the service throttling us, matching the stop
/// policy this signal drives.
fn extract_content(body: &serde_json::Value) -> CurationResult<String> {
    body.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(|text| text.trim().to_string())
        .ok_or(CurationError::RateLimited)
}

#[async_trait]
impl VisionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> CurationResult<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text {
                        text: request.prompt.clone(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                        },
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CurationError::Http {
                message: format!("request failed: {e}"),
            })?;

        // Status is deliberately not checked here: rate-limit error bodies
        // are JSON too, and are detected by their missing completion path.
        let json: serde_json::Value = resp.json().await.map_err(|e| CurationError::Http {
            message: format!("response was not JSON: {e}"),
        })?;

        extract_content(&json)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
