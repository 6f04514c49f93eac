use anyhow::Result;

use mycelia::config::MyceliaConfig;
use mycelia::vault::graph::build_graph;

/// Print the vault link graph as JSON on stdout.
pub async fn graph(config: &MyceliaConfig, pretty: bool) -> Result<()> {
    let store = super::require_vault(config)?;
    let corpus = store.read_all().await?;
    let graph = build_graph(&corpus);

    tracing::info!(nodes = graph.nodes.len(), links = graph.links.len(), "graph built");

    let json = if pretty {
        serde_json::to_string_pretty(&graph)?
    } else {
        serde_json::to_string(&graph)?
    };
    println!("{json}");
    Ok(())
}
