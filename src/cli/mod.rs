pub mod chat;
pub mod graph;
pub mod init;
pub mod reset;
pub mod stats;

use anyhow::{Context, Result};

use mycelia::config::MyceliaConfig;
use mycelia::vault::NoteStore;

/// Store for the configured vault, or an error telling the user how to set one.
fn require_vault(config: &MyceliaConfig) -> Result<NoteStore> {
    let root = config
        .vault_root()
        .context("no vault configured; set [vault] path in ~/.mycelia/config.toml or MYCELIA_VAULT")?;
    Ok(NoteStore::new(root))
}
