//! Retrieval by context stuffing.
//!
//! [`is_retrieval_query`] is an ordered list of recall phrasings; any hit marks the
//! message as a question about the vault. [`assemble_context`] then concatenates whole
//! notes, in corpus order, until the next one would overflow [`MAX_CONTEXT_CHARS`].

use anyhow::{Context, Result};
use regex::Regex;
use std::sync::LazyLock;

use crate::config::MyceliaConfig;
use crate::vault::{Corpus, NoteStore};

/// Character budget for assembled context (~100k tokens).
pub const MAX_CONTEXT_CHARS: usize = 400_000;

const RETRIEVAL_PATTERNS: &[&str] = &[
    r"what did (i|we)",
    r"when did (i|we)",
    r"remind me",
    r"what do i know",
    r"what have i",
    r"do i have any notes",
    r"search (my|for)",
    r"find (my|me)",
    r"tell me about",
    r"what('s| is) my",
    r"did i (mention|say|write|note|decide)",
    r"recall",
    r"look up",
    r"what were my",
    r"summarize my",
];

static RETRIEVAL_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    RETRIEVAL_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("valid retrieval pattern"))
        .collect()
});

/// The first recall pattern `message` matches, if any.
pub fn matching_pattern(message: &str) -> Option<&'static str> {
    RETRIEVAL_RULES
        .iter()
        .zip(RETRIEVAL_PATTERNS)
        .find(|(rule, _)| rule.is_match(message))
        .map(|(_, pattern)| *pattern)
}

/// Whether `message` asks about something in the vault.
pub fn is_retrieval_query(message: &str) -> bool {
    matching_pattern(message).is_some()
}

/// Concatenated `### File:` sections plus the number of notes included.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledContext {
    pub text: String,
    pub included: usize,
    pub omitted: usize,
}

/// Render whole notes from `corpus` until the next one would exceed `budget` characters.
///
/// A note that does not fit is left out entirely and assembly stops there.
pub fn assemble_context(corpus: &Corpus, budget: usize) -> AssembledContext {
    let mut text = String::new();
    let mut used = 0;
    let mut included = 0;

    for (path, content) in corpus {
        let section = format!("\n### File: {path}\n{content}\n");
        let len = section.chars().count();
        if used + len > budget {
            break;
        }
        text.push_str(&section);
        used += len;
        included += 1;
    }

    AssembledContext {
        text,
        included,
        omitted: corpus.len() - included,
    }
}

/// Load the vault and assemble its context under [`MAX_CONTEXT_CHARS`].
///
/// `None` when no vault is configured, its folder does not exist yet, or it holds no
/// notes. Failing to read an existing vault is an error.
pub async fn build_context(config: &MyceliaConfig) -> Result<Option<String>> {
    let Some(root) = config.vault_root() else {
        return Ok(None);
    };
    if !tokio::fs::try_exists(&root).await.unwrap_or(false) {
        tracing::debug!(root = %root.display(), "vault folder missing, no context");
        return Ok(None);
    }

    let corpus = NoteStore::new(root)
        .read_all()
        .await
        .context("failed to load vault for retrieval")?;
    if corpus.is_empty() {
        return Ok(None);
    }

    let assembled = assemble_context(&corpus, MAX_CONTEXT_CHARS);
    if assembled.omitted > 0 {
        tracing::warn!(
            included = assembled.included,
            omitted = assembled.omitted,
            "vault context truncated at budget"
        );
    }
    Ok(Some(assembled.text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recall_questions_match() {
        assert!(is_retrieval_query("What did I decide about the farrier idea?"));
        assert!(is_retrieval_query("can you REMIND ME what Sam said"));
        assert!(is_retrieval_query("What's my plan for Q3?"));
        assert_eq!(matching_pattern("did i mention the boat?"), Some(r"did i (mention|say|write|note|decide)"));
    }

    #[test]
    fn ordinary_chat_does_not_match() {
        assert!(!is_retrieval_query("Let's talk about my day."));
        assert!(!is_retrieval_query("I had a great idea for a startup"));
    }

    #[test]
    fn first_pattern_wins() {
        // matches both "what did (i|we)" and "recall"
        assert_eq!(matching_pattern("what did I recall"), Some("what did (i|we)"));
    }

    fn corpus(entries: &[(&str, &str)]) -> Corpus {
        entries.iter().map(|(p, c)| (p.to_string(), c.to_string())).collect()
    }

    #[test]
    fn sections_are_rendered_verbatim() {
        let c = corpus(&[("ideas/a.md", "alpha"), ("topics/b.md", "beta")]);
        let ctx = assemble_context(&c, MAX_CONTEXT_CHARS);
        assert_eq!(ctx.text, "\n### File: ideas/a.md\nalpha\n\n### File: topics/b.md\nbeta\n");
        assert_eq!(ctx.included, 2);
        assert_eq!(ctx.omitted, 0);
    }

    #[test]
    fn overflowing_note_is_omitted_whole() {
        let c = corpus(&[("a.md", "x".repeat(50).as_str()), ("b.md", "y".repeat(50).as_str()), ("c.md", "z")]);
        let first_len = "\n### File: a.md\n\n".len() + 50;
        let ctx = assemble_context(&c, first_len + 10);
        assert_eq!(ctx.included, 1);
        assert_eq!(ctx.omitted, 2);
        assert!(!ctx.text.contains('y'));
        // assembly stops; the small note after the overflow is not squeezed in
        assert!(!ctx.text.contains("c.md"));
        assert!(ctx.text.chars().count() <= first_len + 10);
    }
}
