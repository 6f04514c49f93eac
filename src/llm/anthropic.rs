//! Anthropic Messages API client.
//!
//! Implements [`LanguageModel`] over HTTP with `reqwest`. Streaming replies are
//! read as server-sent events: `content_block_delta` text is forwarded and an
//! `error` event ends the call with [`GatewayError::Stream`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GatewayError, LanguageModel, Message};
use crate::config::LlmConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            max_tokens: config.max_tokens,
        }
    }

    async fn send(&self, request: &MessagesRequest<'_>) -> Result<reqwest::Response, GatewayError> {
        if self.api_key.trim().is_empty() {
            return Err(GatewayError::MissingApiKey);
        }

        tracing::debug!(model = %request.model, stream = request.stream, "sending model request");

        let response = self
            .client
            .post(format!("{}/messages", self.endpoint))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(model = %request.model, status = %status, body = %body, "model API returned error status");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl LanguageModel for AnthropicClient {
    async fn complete(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
    ) -> Result<String, GatewayError> {
        let request = MessagesRequest {
            model,
            max_tokens: self.max_tokens,
            system,
            messages,
            stream: false,
        };
        let response = self.send(&request).await?;
        let bytes = response.bytes().await?;
        let parsed: MessagesResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .unwrap_or_default())
    }

    async fn stream(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String, GatewayError> {
        let request = MessagesRequest {
            model,
            max_tokens: self.max_tokens,
            system,
            messages,
            stream: true,
        };
        let mut response = self.send(&request).await?;

        let mut full = String::new();
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = response.chunk().await? {
            buffer.extend_from_slice(&chunk);

            // Only complete lines are decoded; a trailing partial line waits for more bytes.
            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line);
                match parse_sse_event(line.trim_end()) {
                    Some(SseEvent::Delta(text)) => {
                        full.push_str(&text);
                        on_chunk(&text);
                    }
                    Some(SseEvent::Error { kind, message }) => {
                        tracing::error!(model = %model, kind = %kind, message = %message, streamed = full.len(), "model stream failed");
                        return Err(GatewayError::Stream { kind, message });
                    }
                    None => {}
                }
            }
        }

        Ok(full)
    }
}

/// A stream event the client acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Non-empty text from a `content_block_delta`.
    Delta(String),
    /// An `error` event; the reply is incomplete.
    Error { kind: String, message: String },
}

/// Decode one SSE line.
///
/// Non-`data:` lines, `[DONE]`, malformed JSON and other event types yield `None`.
pub fn parse_sse_event(line: &str) -> Option<SseEvent> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return None;
    }
    let event: Value = serde_json::from_str(data).ok()?;
    match event.get("type")?.as_str()? {
        "content_block_delta" => event
            .get("delta")?
            .get("text")?
            .as_str()
            .filter(|t| !t.is_empty())
            .map(|t| SseEvent::Delta(t.to_string())),
        "error" => {
            let error = event.get("error");
            let field = |key: &str| {
                error
                    .and_then(|e| e.get(key))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            let kind = field("type");
            Some(SseEvent::Error {
                kind: if kind.is_empty() { "error".to_string() } else { kind },
                message: field("message"),
            })
        }
        _ => None,
    }
}
