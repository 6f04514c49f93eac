//! Conversational knowledge capture for a plain-text note vault.
//!
//! Mycelia listens to a chat and quietly mines each exchange for durable knowledge
//! (ideas, decisions, facts, plans), writing it as cross-linked markdown notes. Recall
//! questions are answered by stuffing the whole vault into the model's context.
//!
//! # Vault layout
//!
//! | Folder | Holds |
//! |--------|-------|
//! | `topics/` | General knowledge, concepts, interests |
//! | `people/` | People mentioned |
//! | `projects/` | Projects and ventures |
//! | `decisions/` | Decisions with reasoning |
//! | `ideas/` | Raw ideas and what-ifs |
//! | `journals/` | One `YYYY-MM-DD.md` per day |
//! | `.mycelia/` | Internal state (conversation log); never part of the corpus |
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`vault`]: Note storage, content parsing, and the link graph
//! - [`llm`]: Language model gateway trait and the Anthropic client
//! - [`knowledge`]: Extraction, journaling, and retrieval engines
//! - [`chat`]: Conversational session tying the engines to a chat loop

pub mod chat;
pub mod config;
pub mod knowledge;
pub mod llm;
pub mod vault;
