//! Vault data types.
//!
//! Defines [`Folder`] (the fixed topical subfolders of a vault), [`Role`] and
//! [`ConversationTurn`] (one persisted chat message).

use serde::{Deserialize, Serialize};

/// Extension every note file carries.
pub const NOTE_EXTENSION: &str = "md";

/// Reserved internal-state folder, never listed as part of the corpus.
pub const STATE_DIR: &str = ".mycelia";

/// Sidecar conversation log inside [`STATE_DIR`].
pub const CONVERSATION_LOG: &str = "chat.json";

/// The topical subfolders a note can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Folder {
    /// General knowledge, concepts, learning, interests.
    Topics,
    /// People mentioned: friends, colleagues, public figures.
    People,
    /// Active projects, businesses, side projects.
    Projects,
    /// Decisions made, with reasoning.
    Decisions,
    /// Raw ideas and what-ifs.
    Ideas,
    /// One file per calendar day, written by the journal engine.
    Journals,
}

impl Folder {
    pub const ALL: [Folder; 6] = [
        Folder::Journals,
        Folder::Topics,
        Folder::People,
        Folder::Projects,
        Folder::Decisions,
        Folder::Ideas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Topics => "topics",
            Self::People => "people",
            Self::Projects => "projects",
            Self::Decisions => "decisions",
            Self::Ideas => "ideas",
            Self::Journals => "journals",
        }
    }
}

impl std::fmt::Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Folder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topics" => Ok(Self::Topics),
            "people" => Ok(Self::People),
            "projects" => Ok(Self::Projects),
            "decisions" => Ok(Self::Decisions),
            "ideas" => Ok(Self::Ideas),
            "journals" => Ok(Self::Journals),
            _ => Err(format!("unknown folder: {s}")),
        }
    }
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Speaker label used when a transcript is rendered into a prompt.
    pub fn speaker(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One chat message, as stored in the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// UUID v7 (time-sortable).
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
