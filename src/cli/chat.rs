//! CLI `chat` command: interactive conversation with streamed replies.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use mycelia::chat::ChatSession;
use mycelia::config::MyceliaConfig;
use mycelia::llm::anthropic::AnthropicClient;
use mycelia::llm::LanguageModel;

/// Run the chat loop until `/quit` or end of input.
pub async fn chat(config: Arc<MyceliaConfig>) -> Result<()> {
    if config.vault_root().is_none() {
        println!("No vault configured: replies work, but nothing will be saved.");
    }

    let model: Arc<dyn LanguageModel> = Arc::new(AnthropicClient::new(&config.llm));
    let mut session = ChatSession::open(Arc::clone(&config), model).await?;

    if !session.turns().is_empty() {
        println!("Resumed conversation ({} turns). Type /clear to start over.", session.turns().len());
    }
    println!("Type /quit to exit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        match text {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear().await?;
                println!("Conversation cleared.\n");
                continue;
            }
            _ => {}
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .expect("valid template"),
        );
        spinner.set_message("thinking");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let mut first = true;
        let mut print_chunk = |chunk: &str| {
            if first {
                spinner.finish_and_clear();
                first = false;
            }
            print!("{chunk}");
            let _ = std::io::stdout().flush();
        };

        let result = session.send(text, &mut print_chunk).await;
        spinner.finish_and_clear();
        println!("\n");

        if let Err(e) = result {
            eprintln!("error: {e:#}\n");
        }
    }

    println!("Saving what was learned...");
    session.finish().await;
    Ok(())
}
