//! The knowledge pipeline: what gets mined out of a conversation and what gets fed back in.
//!
//! - [`extraction`] turns recent turns into note writes
//! - [`blocks`] parses the extraction model's note blocks
//! - [`journal`] appends a dated summary of each exchange
//! - [`retrieval`] classifies recall questions and stuffs the vault into context
//! - [`prompts`] holds every system instruction

pub mod blocks;
pub mod extraction;
pub mod journal;
pub mod prompts;
pub mod retrieval;

/// Today's local calendar date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
