//! Note content parsing: link references, frontmatter, path helpers.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("valid link regex"));

static FRONTMATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^---\n([\s\S]*?)\n---").expect("valid frontmatter regex"));

static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+):\s*(.+)$").expect("valid field regex"));

/// Parsed frontmatter: key → unquoted value.
pub type Frontmatter = BTreeMap<String, String>;

/// Extract every `[[reference]]` in `content`, de-duplicated, in order of first appearance.
pub fn extract_links(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    LINK_RE
        .captures_iter(content)
        .map(|cap| cap[1].to_string())
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

/// Parse the leading `---` delimited `key: value` block.
///
/// Returns an empty map when the content has no frontmatter. Surrounding single or
/// double quotes are stripped from values; lines that are not `key: value` are ignored.
pub fn extract_frontmatter(content: &str) -> Frontmatter {
    let normalized = content.replace("\r\n", "\n");
    let Some(cap) = FRONTMATTER_RE.captures(&normalized) else {
        return Frontmatter::new();
    };

    cap[1]
        .lines()
        .filter_map(|line| FIELD_RE.captures(line))
        .map(|kv| (kv[1].to_string(), strip_quotes(kv[2].trim()).to_string()))
        .collect()
}

/// Render a frontmatter block from `(key, value)` pairs, in the order given.
pub fn render_frontmatter<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = String::from("---\n");
    for (key, value) in fields {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out.push_str("---\n");
    out
}

fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

/// First path component of a vault-relative path, or `root` for top-level files.
pub fn folder_of(path: &str) -> &str {
    match path.split_once('/') {
        Some((folder, _)) => folder,
        None => "root",
    }
}

/// File name without directories or the `.md` extension.
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.strip_suffix(".md").unwrap_or(name)
}

/// Kebab-case a title or link text for use as a file name.
pub fn slugify(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(cleaned.len());
    for word in cleaned.split_whitespace() {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(word);
    }

    let mut collapsed = String::with_capacity(slug.len());
    for c in slug.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_are_deduplicated_in_order() {
        let body = "Met [[Alice]] about [[Farriers]]. Later [[Alice]] mentioned [[B2B SaaS]].";
        assert_eq!(extract_links(body), vec!["Alice", "Farriers", "B2B SaaS"]);
    }

    #[test]
    fn no_links_yields_empty() {
        assert!(extract_links("plain text with [single] brackets").is_empty());
    }

    #[test]
    fn frontmatter_strips_quotes() {
        let note = "---\ntitle: \"Niche Software\"\ntags: [business]\ndate: 2026-02-18\n---\n\nBody";
        let fm = extract_frontmatter(note);
        assert_eq!(fm.get("title").map(String::as_str), Some("Niche Software"));
        assert_eq!(fm.get("tags").map(String::as_str), Some("[business]"));
        assert_eq!(fm.get("date").map(String::as_str), Some("2026-02-18"));
    }

    #[test]
    fn frontmatter_tolerates_crlf() {
        let note = "---\r\ntitle: Windows\r\n---\r\nbody";
        assert_eq!(extract_frontmatter(note).get("title").map(String::as_str), Some("Windows"));
    }

    #[test]
    fn missing_frontmatter_is_empty() {
        assert!(extract_frontmatter("# Just a heading\n\ntext").is_empty());
        assert!(extract_frontmatter("text\n---\ntitle: late\n---").is_empty());
    }

    #[test]
    fn frontmatter_round_trips() {
        let fields = [("date", "2026-03-01"), ("source", "conversation"), ("title", "Round Trip")];
        let rendered = render_frontmatter(fields);
        let parsed = extract_frontmatter(&rendered);
        let expected: Frontmatter = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn folder_and_stem() {
        assert_eq!(folder_of("ideas/farriers.md"), "ideas");
        assert_eq!(folder_of("README.md"), "root");
        assert_eq!(file_stem("ideas/farriers.md"), "farriers");
        assert_eq!(file_stem("notes.txt"), "notes.txt");
    }

    #[test]
    fn slugify_kebab_cases() {
        assert_eq!(slugify("Niche Software -- Farriers!"), "niche-software-farriers");
        assert_eq!(slugify("  B2B   SaaS "), "b2b-saas");
    }
}
