//! Daily journal: one summarized entry per exchange in `journals/<date>.md`.

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::config::MyceliaConfig;
use crate::knowledge::extraction::SkipReason;
use crate::knowledge::prompts::{journal_prompt, journal_request, NO_ENTRY};
use crate::llm::{LanguageModel, Message};
use crate::vault::parser::render_frontmatter;
use crate::vault::types::Folder;
use crate::vault::NoteStore;

#[derive(Debug, PartialEq)]
pub enum JournalOutcome {
    Skipped(SkipReason),
    /// The model answered with the no-entry sentinel.
    NothingToRecord,
    /// An entry was written to `filename` inside `journals/`.
    Recorded { filename: String, created: bool },
}

/// Summarize one exchange into today's journal.
pub async fn record_exchange(
    config: &MyceliaConfig,
    model: &dyn LanguageModel,
    user_text: &str,
    assistant_text: &str,
) -> Result<JournalOutcome> {
    record_exchange_at(config, model, user_text, assistant_text, Local::now()).await
}

/// [`record_exchange`] with an explicit wall-clock time.
pub async fn record_exchange_at(
    config: &MyceliaConfig,
    model: &dyn LanguageModel,
    user_text: &str,
    assistant_text: &str,
    now: DateTime<Local>,
) -> Result<JournalOutcome> {
    let Some(root) = config.vault_root() else {
        tracing::warn!("journal skipped: no vault configured");
        return Ok(JournalOutcome::Skipped(SkipReason::NoVault));
    };
    if !config.has_api_key() {
        tracing::warn!("journal skipped: no API key configured");
        return Ok(JournalOutcome::Skipped(SkipReason::NoApiKey));
    }

    tracing::info!(model = %config.llm.extraction_model, "summarizing exchange for journal");
    let summary = model
        .complete(
            &config.llm.extraction_model,
            &journal_prompt(config.vault.writing_perspective),
            &[Message::user(journal_request(user_text, assistant_text))],
        )
        .await?;

    let summary = summary.trim();
    if summary == NO_ENTRY {
        tracing::info!("nothing worth journaling");
        return Ok(JournalOutcome::NothingToRecord);
    }

    let store = NoteStore::new(root);
    let folder = Folder::Journals.as_str();
    store.ensure_folder(folder).await?;

    let date = now.format("%Y-%m-%d").to_string();
    let filename = format!("{date}.md");
    let entry = format!("## {}\n{summary}\n", now.format("%H:%M"));

    let created = !store.exists(folder, &filename).await;
    let content = if created {
        format!("{}\n{entry}", journal_header(&now))
    } else {
        entry
    };

    store.write(folder, &filename, &content).await?;
    tracing::info!(filename = %filename, created, "journal entry written");

    Ok(JournalOutcome::Recorded { filename, created })
}

/// Frontmatter plus a human-readable date heading, e.g. `# Tuesday, February 18, 2026`.
fn journal_header(now: &DateTime<Local>) -> String {
    let date = now.format("%Y-%m-%d").to_string();
    let title = format!("\"{date}\"");
    let frontmatter = render_frontmatter([
        ("title", title.as_str()),
        ("date", date.as_str()),
        ("type", "journal"),
    ]);
    format!("{frontmatter}\n# {}\n", now.format("%A, %B %-d, %Y"))
}
