//! The vault: a folder tree of markdown notes plus a sidecar conversation log.
//!
//! - [`store`] reads and writes notes (append-only) and the conversation log
//! - [`parser`] extracts link references and frontmatter from note text
//! - [`graph`] derives the node/link view used for visualization
//! - [`types`] holds the shared data types

pub mod graph;
pub mod parser;
pub mod store;
pub mod types;

pub use store::{Corpus, NoteStore};
