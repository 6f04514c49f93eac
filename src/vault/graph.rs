//! Link graph over the corpus.
//!
//! [`build_graph`] turns a corpus snapshot into nodes and links for visualization.
//! Link references resolve case-insensitively against note names or path substrings;
//! anything unresolved becomes a single phantom node per lower-cased reference.

use serde::Serialize;
use std::collections::HashMap;

use crate::vault::parser::{extract_frontmatter, extract_links, file_stem, folder_of};
use crate::vault::store::Corpus;

/// Prefix of phantom node ids.
pub const PHANTOM_PREFIX: &str = "_link_";

/// Folder label for top-level notes and phantom nodes.
pub const ROOT_FOLDER: &str = "root";

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    /// Vault-relative path, or `_link_<reference>` for phantoms.
    pub id: String,
    /// Frontmatter title, else the file stem; the reference text for phantoms.
    pub name: String,
    pub folder: String,
    pub color: &'static str,
    /// Degree: number of retained links touching this node.
    pub connections: usize,
    /// `true` when no note backs this node.
    pub phantom: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Default, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphData {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn phantom_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.phantom).count()
    }
}

/// Display colour for a folder label.
pub fn folder_color(folder: &str) -> &'static str {
    match folder {
        "journals" => "#f59e0b",
        "topics" => "#3b82f6",
        "people" => "#10b981",
        "projects" => "#8b5cf6",
        "decisions" => "#ef4444",
        "ideas" => "#ec4899",
        _ => "#6b7280",
    }
}

/// Build the node/link view of `corpus`. Pure; nothing is cached between calls.
pub fn build_graph(corpus: &Corpus) -> GraphData {
    let mut nodes: Vec<GraphNode> = Vec::with_capacity(corpus.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(corpus.len());

    for (path, content) in corpus {
        let frontmatter = extract_frontmatter(content);
        let folder = folder_of(path);
        let name = frontmatter
            .get("title")
            .filter(|t| !t.is_empty())
            .cloned()
            .unwrap_or_else(|| file_stem(path).to_string());

        index.insert(path.clone(), nodes.len());
        nodes.push(GraphNode {
            id: path.clone(),
            name,
            folder: folder.to_string(),
            color: folder_color(folder),
            connections: 0,
            phantom: false,
        });
    }

    // Only real notes are resolution candidates; phantoms are keyed separately.
    let note_count = nodes.len();
    let mut links = Vec::new();

    for (path, content) in corpus {
        for link in extract_links(content) {
            let link_lower = link.to_lowercase();

            let resolved = nodes[..note_count]
                .iter()
                .position(|node| {
                    node.name.to_lowercase() == link_lower
                        || node.id.to_lowercase().contains(&link_lower)
                });

            let target = match resolved {
                Some(i) => i,
                None => {
                    let phantom_id = format!("{PHANTOM_PREFIX}{link_lower}");
                    *index.entry(phantom_id.clone()).or_insert_with(|| {
                        nodes.push(GraphNode {
                            id: phantom_id,
                            name: link.clone(),
                            folder: ROOT_FOLDER.to_string(),
                            color: folder_color(ROOT_FOLDER),
                            connections: 0,
                            phantom: true,
                        });
                        nodes.len() - 1
                    })
                }
            };

            let source = index[path];
            if source == target {
                continue;
            }

            nodes[source].connections += 1;
            nodes[target].connections += 1;
            links.push(GraphLink {
                source: path.clone(),
                target: nodes[target].id.clone(),
            });
        }
    }

    GraphData { nodes, links }
}
