use anyhow::Result;
use std::collections::BTreeMap;

use mycelia::config::MyceliaConfig;
use mycelia::vault::graph::build_graph;
use mycelia::vault::parser::folder_of;

/// Display vault statistics in the terminal.
pub async fn stats(config: &MyceliaConfig) -> Result<()> {
    let store = super::require_vault(config)?;
    let corpus = store.read_all().await?;
    let graph = build_graph(&corpus);
    let history = store.load_conversation_log().await?;

    let mut by_folder: BTreeMap<&str, usize> = BTreeMap::new();
    for path in corpus.keys() {
        *by_folder.entry(folder_of(path)).or_default() += 1;
    }
    let total_chars: usize = corpus.values().map(|c| c.chars().count()).sum();

    println!("Vault Statistics");
    println!("{}", "=".repeat(40));
    println!("  Vault:               {}", store.root().display());
    println!("  Configured:          {}", if config.is_configured() { "yes" } else { "no (missing API key)" });
    println!("  Writing perspective: {}", config.vault.writing_perspective);
    println!("  Total notes:         {}", corpus.len());
    println!("  Total characters:    {total_chars}");
    println!();

    println!("By Folder:");
    for (folder, count) in &by_folder {
        println!("  {:<12} {}", folder, count);
    }
    println!();

    println!("Links:                 {}", graph.links.len());
    println!("Unresolved references: {}", graph.phantom_count());
    println!("Conversation turns:    {}", history.len());

    Ok(())
}
