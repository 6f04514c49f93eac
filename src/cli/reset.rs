//! CLI `reset` command: clear the conversation log after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use mycelia::config::MyceliaConfig;

/// Clear the persisted conversation. Notes are left untouched.
pub async fn reset(config: &MyceliaConfig) -> Result<()> {
    let store = super::require_vault(config)?;

    println!("This will clear the saved conversation history. Notes are not affected.");
    println!("Vault: {}", store.root().display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    store.clear_conversation_log().await?;

    println!("Conversation history cleared.");
    Ok(())
}
