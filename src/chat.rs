//! Conversational session.
//!
//! [`ChatSession`] owns the turn history for one vault. Each [`ChatSession::send`]
//! streams a reply (with vault context when the message is a recall question), logs
//! both turns, then hands the exchange to extraction and journaling as background
//! tasks. Background failures are logged and never reach the caller.

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::MyceliaConfig;
use crate::knowledge::extraction::extract_knowledge;
use crate::knowledge::journal::record_exchange;
use crate::knowledge::prompts::{retrieval_prompt, COMPANION_PROMPT};
use crate::knowledge::retrieval::{build_context, matching_pattern};
use crate::llm::{LanguageModel, Message};
use crate::vault::types::ConversationTurn;
use crate::vault::NoteStore;

pub struct ChatSession {
    config: Arc<MyceliaConfig>,
    model: Arc<dyn LanguageModel>,
    store: Option<NoteStore>,
    turns: Vec<ConversationTurn>,
    background: Vec<JoinHandle<()>>,
}

impl ChatSession {
    /// Open a session, restoring the persisted conversation when a vault is configured.
    pub async fn open(config: Arc<MyceliaConfig>, model: Arc<dyn LanguageModel>) -> Result<Self> {
        let store = config.vault_root().map(NoteStore::new);
        let turns = match &store {
            Some(store) => store.load_conversation_log().await?,
            None => Vec::new(),
        };
        tracing::debug!(turns = turns.len(), "chat session opened");

        Ok(Self {
            config,
            model,
            store,
            turns,
            background: Vec::new(),
        })
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Send a user message and stream the reply through `on_chunk`.
    ///
    /// On a gateway failure, any text already streamed is kept as the assistant turn
    /// and the error is returned.
    pub async fn send(
        &mut self,
        text: &str,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String> {
        if !self.config.has_api_key() {
            bail!("API key not configured");
        }

        self.turns.push(ConversationTurn::user(text));
        self.persist().await;

        let system = self.system_prompt(text).await;
        let messages: Vec<Message> = self.turns.iter().map(Message::from).collect();

        let mut partial = String::new();
        let result = {
            let mut forward = |chunk: &str| {
                partial.push_str(chunk);
                on_chunk(chunk);
            };
            self.model
                .stream(&self.config.llm.model, &system, &messages, &mut forward)
                .await
        };

        match result {
            Ok(reply) => {
                self.turns.push(ConversationTurn::assistant(reply.clone()));
                self.persist().await;
                self.spawn_background(text, &reply);
                Ok(reply)
            }
            Err(e) => {
                if !partial.is_empty() {
                    self.turns.push(ConversationTurn::assistant(partial));
                    self.persist().await;
                }
                Err(e).context("chat reply failed")
            }
        }
    }

    /// Forget the conversation, in memory and on disk.
    pub async fn clear(&mut self) -> Result<()> {
        self.turns.clear();
        if let Some(store) = &self.store {
            store.clear_conversation_log().await?;
        }
        Ok(())
    }

    /// Wait for outstanding extraction and journal tasks.
    pub async fn finish(&mut self) {
        for handle in self.background.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "background task panicked");
            }
        }
    }

    async fn system_prompt(&self, text: &str) -> String {
        let Some(pattern) = matching_pattern(text) else {
            return COMPANION_PROMPT.to_string();
        };
        tracing::debug!(pattern, "message classified as retrieval query");

        match build_context(&self.config).await {
            Ok(Some(context)) => retrieval_prompt(&context),
            Ok(None) => COMPANION_PROMPT.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "vault context unavailable");
                COMPANION_PROMPT.to_string()
            }
        }
    }

    async fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save_conversation_log(&self.turns).await {
                tracing::warn!(error = %e, "failed to persist conversation log");
            }
        }
    }

    fn spawn_background(&mut self, user_text: &str, reply: &str) {
        self.background.retain(|h| !h.is_finished());

        let config = Arc::clone(&self.config);
        let model = Arc::clone(&self.model);
        let turns = self.turns.clone();
        self.background.push(tokio::spawn(async move {
            match extract_knowledge(&config, model.as_ref(), &turns).await {
                Ok(outcome) => {
                    tracing::debug!(written = outcome.written_count(), "extraction finished")
                }
                Err(e) => tracing::warn!(error = %e, "extraction failed"),
            }
        }));

        let config = Arc::clone(&self.config);
        let model = Arc::clone(&self.model);
        let user_text = user_text.to_string();
        let reply = reply.to_string();
        self.background.push(tokio::spawn(async move {
            if let Err(e) = record_exchange(&config, model.as_ref(), &user_text, &reply).await {
                tracing::warn!(error = %e, "journal entry failed");
            }
        }));
    }
}
