//! Featherless chat completions (OpenAI-compatible `/chat/completions`).

use endurance_config::FeatherlessConfig;
use serde::Serialize;
use serde_json::Value;

use crate::client::{RelayClient, Reply};
use crate::error::RelayError;
use crate::sanitize::sanitize;

const MAX_TOKENS: u32 = 800;
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Clone)]
pub struct FeatherlessClient {
    relay: RelayClient,
    url: String,
    api_key: String,
    model: String,
}

impl FeatherlessClient {
    #[must_use]
    pub fn new(config: &FeatherlessConfig, relay: RelayClient) -> Self {
        Self {
            relay,
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// One system + user exchange; returns the sanitized assistant text.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::NotConfigured`] without an API key,
    /// [`RelayError::Parse`] if the reply carries no message content, and
    /// any transport error from the relay.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, RelayError> {
        if !self.is_configured() {
            return Err(RelayError::NotConfigured("featherless"));
        }
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            stream: false,
        };
        let body = serde_json::to_value(&request).map_err(|e| RelayError::Parse(e.to_string()))?;

        match self.relay.post_json(&self.url, Some(&self.api_key), &body).await? {
            Reply::Json(value) => message_content(&value)
                .map(sanitize)
                .ok_or_else(|| RelayError::Parse("completion has no message content".into())),
            Reply::Text(text) => Ok(text),
        }
    }
}

fn message_content(value: &Value) -> Option<&str> {
    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
}
