//! Parser for the extraction model's note blocks.
//!
//! Model output is untrusted text. [`split_blocks`] cuts a reply on `===` lines and
//! [`parse_block`] turns each piece into a [`NoteWriteOperation`] or a [`BlockError`].
//! A bad block never affects its siblings.

use regex::Regex;
use std::sync::LazyLock;

use crate::vault::parser::render_frontmatter;
use crate::vault::types::Folder;

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^---[ \t]*\n([\s\S]*?)\n---[ \t]*(?:\n([\s\S]*))?$").expect("valid block regex")
});

pub const DEFAULT_FILENAME: &str = "untitled.md";
pub const DEFAULT_TITLE: &str = "Untitled";

/// How a note write lands on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Full frontmatter + body. Appended after existing content if the file exists.
    Create,
    /// A `## <date>` subsection added to the note.
    Append,
}

impl WriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Append => "append",
        }
    }
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated note write parsed from a model block.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteWriteOperation {
    pub title: String,
    pub folder: Folder,
    pub filename: String,
    pub mode: WriteMode,
    pub tags: Vec<String>,
    /// ISO calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Trimmed markdown body; never empty.
    pub body: String,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("block has no ---...--- header")]
    MissingFrontmatter,
    #[error("block body is empty")]
    EmptyBody,
}

impl NoteWriteOperation {
    /// Text handed to the note store for this operation.
    pub fn render(&self) -> String {
        match self.mode {
            WriteMode::Append => format!("## {}\n{}", self.date, self.body),
            WriteMode::Create => {
                let title = format!("\"{}\"", self.title);
                let tags = format!("[{}]", self.tags.join(", "));
                let header = render_frontmatter([
                    ("title", title.as_str()),
                    ("tags", tags.as_str()),
                    ("date", self.date.as_str()),
                    ("source", "conversation"),
                ]);
                format!("{header}\n{}\n", self.body)
            }
        }
    }
}

/// Split a reply into candidate blocks on lines that contain only `===`.
///
/// Line endings are normalized first. Whitespace-only pieces are discarded.
pub fn split_blocks(response: &str) -> Vec<String> {
    let normalized = response.replace("\r\n", "\n").replace('\r', "\n");
    let mut blocks = Vec::new();
    let mut current = String::new();

    for line in normalized.lines() {
        if line.trim() == "===" {
            blocks.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    blocks.push(current);

    blocks
        .into_iter()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .collect()
}

/// Parse one block. `today` fills in a missing date.
pub fn parse_block(block: &str, today: &str) -> Result<NoteWriteOperation, BlockError> {
    let normalized = block.replace("\r\n", "\n");
    let normalized = normalized.trim();

    let caps = BLOCK_RE
        .captures(normalized)
        .ok_or(BlockError::MissingFrontmatter)?;
    let header = caps.get(1).map_or("", |m| m.as_str());
    let body = caps.get(2).map_or("", |m| m.as_str()).trim();

    if body.is_empty() {
        return Err(BlockError::EmptyBody);
    }

    let folder = match scalar(header, "folder") {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::debug!(folder = %raw, "unknown folder, using topics");
            Folder::Topics
        }),
        None => Folder::Topics,
    };

    let mode = match scalar(header, "mode") {
        Some("append") => WriteMode::Append,
        _ => WriteMode::Create,
    };

    Ok(NoteWriteOperation {
        title: scalar(header, "title").unwrap_or(DEFAULT_TITLE).to_string(),
        folder,
        filename: normalize_filename(scalar(header, "filename").unwrap_or("")),
        mode,
        tags: field(header, "tags").map(parse_tags).unwrap_or_default(),
        date: scalar(header, "date").unwrap_or(today).to_string(),
        body: body.to_string(),
    })
}

/// Value of the first header line starting with `<key>:`.
fn field<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    header.lines().find_map(|line| {
        let rest = line.strip_prefix(key)?.strip_prefix(':')?;
        let value = rest.trim();
        (!value.is_empty()).then_some(value)
    })
}

/// [`field`] with surrounding quotes removed; quoted empty strings count as absent.
fn scalar<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    field(header, key)
        .map(|v| unquote(v).trim())
        .filter(|v| !v.is_empty())
}

fn unquote(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

/// `[a, "b", c]` or `a, b` → `["a", "b", "c"]`.
fn parse_tags(raw: &str) -> Vec<String> {
    let inner = raw.trim();
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    inner
        .split(',')
        .map(|t| unquote(t.trim()).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Keep only the final path component and ensure an `.md` extension.
pub fn normalize_filename(raw: &str) -> String {
    let name = raw
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return DEFAULT_FILENAME.to_string();
    }
    if name.ends_with(".md") {
        name.to_string()
    } else {
        format!("{name}.md")
    }
}
