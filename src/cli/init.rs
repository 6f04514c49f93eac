//! CLI `init` command: create the vault folder layout.

use anyhow::Result;

use mycelia::config::MyceliaConfig;
use mycelia::vault::types::Folder;

pub async fn init(config: &MyceliaConfig) -> Result<()> {
    let store = super::require_vault(config)?;
    store.ensure_structure().await?;

    println!("Vault ready at {}", store.root().display());
    println!("Writing perspective: {}", config.vault.writing_perspective.as_str());
    for folder in Folder::ALL {
        println!("  {folder}/");
    }
    if !config.has_api_key() {
        println!();
        println!("No API key set. Add [llm] api_key to the config or export MYCELIA_API_KEY.");
    }
    Ok(())
}
