#![allow(dead_code)]

use async_trait::async_trait;
use mycelia::config::MyceliaConfig;
use mycelia::knowledge::prompts::{NO_ENTRY, NO_EXTRACTION};
use mycelia::llm::{GatewayError, LanguageModel, Message};
use mycelia::vault::types::ConversationTurn;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

/// Which engine a request came from, inferred from its system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Chat,
    Extraction,
    Journal,
}

fn kind_of(system: &str) -> Kind {
    if system.contains("knowledge extraction engine") {
        Kind::Extraction
    } else if system.contains("journal entry writer") {
        Kind::Journal
    } else {
        Kind::Chat
    }
}

/// A canned model reply.
pub enum Script {
    Reply(String),
    Fail { status: u16, body: String },
    /// Stream `partial`, then fail.
    PartialThenFail { partial: String, status: u16 },
}

#[derive(Debug, Clone)]
pub struct Request {
    pub kind: Kind,
    pub model: String,
    pub system: String,
    pub messages: Vec<Message>,
}

/// In-process stand-in for the model: per-kind reply queues plus a request log.
///
/// An exhausted queue answers with the kind's "nothing to do" reply.
#[derive(Default)]
pub struct ScriptedModel {
    chat: Mutex<VecDeque<Script>>,
    extraction: Mutex<VecDeque<Script>>,
    journal: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, kind: Kind, script: Script) -> Self {
        self.queue(kind).lock().unwrap().push_back(script);
        self
    }

    pub fn reply(self, kind: Kind, text: &str) -> Self {
        self.with(kind, Script::Reply(text.to_string()))
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_of(&self, kind: Kind) -> Vec<Request> {
        self.requests().into_iter().filter(|r| r.kind == kind).collect()
    }

    fn queue(&self, kind: Kind) -> &Mutex<VecDeque<Script>> {
        match kind {
            Kind::Chat => &self.chat,
            Kind::Extraction => &self.extraction,
            Kind::Journal => &self.journal,
        }
    }

    fn next(&self, model: &str, system: &str, messages: &[Message]) -> Script {
        let kind = kind_of(system);
        self.requests.lock().unwrap().push(Request {
            kind,
            model: model.to_string(),
            system: system.to_string(),
            messages: messages.to_vec(),
        });
        self.queue(kind).lock().unwrap().pop_front().unwrap_or_else(|| {
            Script::Reply(
                match kind {
                    Kind::Chat => "ok",
                    Kind::Extraction => NO_EXTRACTION,
                    Kind::Journal => NO_ENTRY,
                }
                .to_string(),
            )
        })
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
    ) -> Result<String, GatewayError> {
        match self.next(model, system, messages) {
            Script::Reply(text) => Ok(text),
            Script::Fail { status, body } => Err(GatewayError::Status { status, body }),
            Script::PartialThenFail { status, .. } => Err(GatewayError::Status {
                status,
                body: String::new(),
            }),
        }
    }

    async fn stream(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String, GatewayError> {
        match self.next(model, system, messages) {
            Script::Reply(text) => {
                for word in text.split_inclusive(' ') {
                    on_chunk(word);
                }
                Ok(text)
            }
            Script::Fail { status, body } => Err(GatewayError::Status { status, body }),
            Script::PartialThenFail { partial, status } => {
                on_chunk(&partial);
                Err(GatewayError::Status {
                    status,
                    body: "overloaded".to_string(),
                })
            }
        }
    }
}

/// A fully configured config pointing at `vault`.
pub fn test_config(vault: &Path) -> MyceliaConfig {
    let mut config = MyceliaConfig::default();
    config.llm.api_key = "sk-test".to_string();
    config.vault.path = vault.to_string_lossy().into_owned();
    config
}

/// Alternating user/assistant turns.
pub fn conversation(lines: &[&str]) -> Vec<ConversationTurn> {
    lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            if i % 2 == 0 {
                ConversationTurn::user(*text)
            } else {
                ConversationTurn::assistant(*text)
            }
        })
        .collect()
}

/// A well-formed note block.
pub fn note_block(title: &str, folder: &str, filename: &str, mode: &str, body: &str) -> String {
    format!(
        "---\ntitle: {title}\nfolder: {folder}\nfilename: {filename}\nmode: {mode}\ntags: [test]\ndate: 2026-02-18\nsource: conversation\n---\n\n{body}\n"
    )
}
