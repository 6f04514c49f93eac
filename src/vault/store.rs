//! Durable note storage over a vault directory.
//!
//! [`NoteStore`] is the only component that touches the vault on disk. Writes never
//! truncate: an existing note gets new content appended after a blank line. The
//! reserved [`STATE_DIR`] folder holds the conversation log and is excluded from
//! every corpus listing.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::vault::types::{ConversationTurn, Folder, CONVERSATION_LOG, NOTE_EXTENSION, STATE_DIR};

/// Every note in the vault, keyed by `/`-separated relative path, in lexical order.
pub type Corpus = BTreeMap<String, String>;

/// Separator placed between existing content and appended content.
const APPEND_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone)]
pub struct NoteStore {
    root: PathBuf,
}

impl NoteStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create every topical folder plus the reserved state folder.
    pub async fn ensure_structure(&self) -> Result<()> {
        for folder in Folder::ALL {
            self.ensure_folder(folder.as_str()).await?;
        }
        self.ensure_folder(STATE_DIR).await
    }

    /// Create `<root>/<folder>` if it does not exist yet.
    pub async fn ensure_folder(&self, folder: &str) -> Result<()> {
        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create folder: {}", dir.display()))
    }

    /// Write `content` to `<folder>/<filename>`.
    ///
    /// Creates the file when absent. When present, appends `content` after two
    /// newlines; existing content is never overwritten. Returns the absolute path.
    pub async fn write(&self, folder: &str, filename: &str, content: &str) -> Result<PathBuf> {
        let path = self.root.join(folder).join(filename);

        // Append mode on create too, so a racing appender's bytes are never overwritten.
        let created = tokio::fs::OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&path)
            .await;

        match created {
            Ok(mut file) => {
                file.write_all(content.as_bytes())
                    .await
                    .with_context(|| format!("failed to write note: {}", path.display()))?;
                file.flush().await?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let mut file = tokio::fs::OpenOptions::new()
                    .append(true)
                    .open(&path)
                    .await
                    .with_context(|| format!("failed to open note for append: {}", path.display()))?;
                // One buffer so a concurrent appender cannot interleave with the separator.
                let appended = format!("{APPEND_SEPARATOR}{content}");
                file.write_all(appended.as_bytes())
                    .await
                    .with_context(|| format!("failed to append note: {}", path.display()))?;
                file.flush().await?;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to create note: {}", path.display()));
            }
        }

        tracing::debug!(path = %path.display(), bytes = content.len(), "note written");
        Ok(path)
    }

    /// Whether `<folder>/<filename>` already exists.
    pub async fn exists(&self, folder: &str, filename: &str) -> bool {
        tokio::fs::try_exists(self.root.join(folder).join(filename))
            .await
            .unwrap_or(false)
    }

    /// Read a single note by vault-relative path.
    pub async fn read(&self, relative_path: &str) -> Result<String> {
        let path = self.root.join(relative_path);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read note: {}", path.display()))
    }

    /// Every `.md` file under the vault, as sorted `/`-separated relative paths.
    ///
    /// Skips the reserved state folder at any depth.
    pub async fn list_all(&self) -> Result<Vec<String>> {
        let mut results = Vec::new();
        let mut pending: Vec<(PathBuf, String)> = vec![(self.root.clone(), String::new())];

        while let Some((dir, prefix)) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .with_context(|| format!("failed to list folder: {}", dir.display()))?;

            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().into_owned();
                let rel = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}/{name}")
                };

                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    if name != STATE_DIR {
                        pending.push((entry.path(), rel));
                    }
                } else if Path::new(&name).extension().is_some_and(|ext| ext == NOTE_EXTENSION) {
                    results.push(rel);
                }
            }
        }

        results.sort();
        Ok(results)
    }

    /// Load the whole corpus.
    pub async fn read_all(&self) -> Result<Corpus> {
        let mut corpus = Corpus::new();
        for rel in self.list_all().await? {
            let content = self.read(&rel).await?;
            corpus.insert(rel, content);
        }
        Ok(corpus)
    }

    fn conversation_log_path(&self) -> PathBuf {
        self.root.join(STATE_DIR).join(CONVERSATION_LOG)
    }

    /// Persist the full conversation, replacing the previous log.
    pub async fn save_conversation_log(&self, turns: &[ConversationTurn]) -> Result<()> {
        self.ensure_folder(STATE_DIR).await?;
        let json = serde_json::to_string_pretty(turns)?;
        let path = self.conversation_log_path();
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("failed to write conversation log: {}", path.display()))
    }

    /// Load the persisted conversation; a missing log is an empty conversation.
    pub async fn load_conversation_log(&self) -> Result<Vec<ConversationTurn>> {
        let path = self.conversation_log_path();
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }
        let contents = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read conversation log: {}", path.display()))?;
        serde_json::from_str(&contents).context("failed to parse conversation log")
    }

    pub async fn clear_conversation_log(&self) -> Result<()> {
        self.save_conversation_log(&[]).await
    }
}
