//! Knowledge extraction: conversation window → validated note writes → vault.
//!
//! [`extract_knowledge`] is the single entry point. It gates on configuration and
//! window size, asks the extraction model for note blocks, parses each block
//! independently and commits the survivors to the [`NoteStore`] one at a time.

use anyhow::Result;
use serde::Serialize;

use crate::config::MyceliaConfig;
use crate::knowledge::blocks::{parse_block, split_blocks, NoteWriteOperation, WriteMode};
use crate::knowledge::prompts::{extraction_prompt, extraction_request, NO_EXTRACTION};
use crate::knowledge::today;
use crate::llm::{LanguageModel, Message};
use crate::vault::types::ConversationTurn;
use crate::vault::NoteStore;

/// Number of most recent turns the model sees.
pub const EXTRACTION_WINDOW: usize = 10;

/// Fewer turns than this and extraction is skipped.
pub const MIN_TURNS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoVault,
    NoApiKey,
    TooFewTurns,
}

/// What one extraction attempt did.
#[derive(Debug, PartialEq)]
pub enum ExtractionOutcome {
    /// Preconditions not met; nothing was asked or written.
    Skipped(SkipReason),
    /// The model answered with the no-extraction sentinel.
    NothingToExtract,
    /// Blocks were processed. `dropped` counts blocks that failed to parse.
    Extracted {
        written: Vec<NoteWriteOperation>,
        dropped: usize,
    },
}

impl ExtractionOutcome {
    pub fn written_count(&self) -> usize {
        match self {
            Self::Extracted { written, .. } => written.len(),
            _ => 0,
        }
    }
}

/// Mine the recent conversation for durable knowledge and write it to the vault.
///
/// Note writes run sequentially; a filesystem error stops the batch and is returned,
/// leaving earlier writes in place. Gateway errors are returned untouched.
pub async fn extract_knowledge(
    config: &MyceliaConfig,
    model: &dyn LanguageModel,
    turns: &[ConversationTurn],
) -> Result<ExtractionOutcome> {
    let Some(root) = config.vault_root() else {
        tracing::warn!("extraction skipped: no vault configured");
        return Ok(ExtractionOutcome::Skipped(SkipReason::NoVault));
    };
    if !config.has_api_key() {
        tracing::warn!("extraction skipped: no API key configured");
        return Ok(ExtractionOutcome::Skipped(SkipReason::NoApiKey));
    }

    let window = &turns[turns.len().saturating_sub(EXTRACTION_WINDOW)..];
    if window.len() < MIN_TURNS {
        tracing::debug!(turns = window.len(), "extraction skipped: too few turns");
        return Ok(ExtractionOutcome::Skipped(SkipReason::TooFewTurns));
    }

    let store = NoteStore::new(root);

    // A vault that was never initialised just has no existing notes yet.
    let existing = store.list_all().await.unwrap_or_else(|e| {
        tracing::debug!(error = %e, "could not list existing notes");
        Vec::new()
    });

    let transcript = window
        .iter()
        .map(|t| format!("{}: {}", t.role.speaker(), t.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    let today = today();
    let system = extraction_prompt(config.vault.writing_perspective, &today);
    let request = [Message::user(extraction_request(&existing, &transcript))];

    tracing::info!(model = %config.llm.extraction_model, turns = window.len(), "extracting knowledge");
    let reply = model
        .complete(&config.llm.extraction_model, &system, &request)
        .await?;
    tracing::debug!(len = reply.len(), "extraction reply received");

    if reply.trim() == NO_EXTRACTION {
        tracing::info!("nothing worth extracting");
        return Ok(ExtractionOutcome::NothingToExtract);
    }

    let blocks = split_blocks(&reply);
    let mut written = Vec::new();
    let mut dropped = 0;

    for block in &blocks {
        let op = match parse_block(block, &today) {
            Ok(op) => op,
            Err(e) => {
                let preview: String = block.chars().take(200).collect();
                tracing::warn!(error = %e, block = %preview, "dropping malformed note block");
                dropped += 1;
                continue;
            }
        };

        commit(&store, &op).await?;
        written.push(op);
    }

    tracing::info!(blocks = blocks.len(), written = written.len(), dropped, "extraction complete");
    Ok(ExtractionOutcome::Extracted { written, dropped })
}

/// Write one operation, creating its folder first.
pub async fn commit(store: &NoteStore, op: &NoteWriteOperation) -> Result<()> {
    let folder = op.folder.as_str();
    store.ensure_folder(folder).await?;

    let content = op.render();
    if op.mode == WriteMode::Append {
        tracing::info!(folder, filename = %op.filename, "appending to note");
    } else {
        tracing::info!(folder, filename = %op.filename, "creating note");
    }
    store.write(folder, &op.filename, &content).await?;
    Ok(())
}
