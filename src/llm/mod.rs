//! Language model gateway.
//!
//! Provides the [`LanguageModel`] trait the engines call through, plus the
//! [`anthropic`] implementation. Every call names its model explicitly so the
//! conversational path and the cheaper extraction path can share one client.

pub mod anthropic;

use async_trait::async_trait;
use serde::Serialize;

use crate::vault::types::{ConversationTurn, Role};

/// A role-tagged message sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

impl From<&ConversationTurn> for Message {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Failures surfaced by a gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("API key not configured")]
    MissingApiKey,
    #[error("model API error ({status}): {body}")]
    Status { status: u16, body: String },
    /// An `error` event received after the stream had started.
    #[error("model stream error ({kind}): {message}")]
    Stream { kind: String, message: String },
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected model response: {0}")]
    Decode(String),
}

/// Text-generation service contract.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a complete reply.
    async fn complete(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
    ) -> Result<String, GatewayError>;

    /// Generate a reply, handing each text fragment to `on_chunk` as it arrives.
    ///
    /// Returns the concatenated text. Fragments already delivered stay delivered
    /// when the call fails part way.
    async fn stream(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String, GatewayError>;
}
