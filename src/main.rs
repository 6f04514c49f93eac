use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use mycelia::config::MyceliaConfig;

mod cli;

#[derive(Parser)]
#[command(name = "mycelia", version, about = "Conversational knowledge capture into a markdown vault")]
struct Cli {
    /// Config file (defaults to ~/.mycelia/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the vault folder layout
    Init,
    /// Start an interactive conversation
    Chat,
    /// Print the note link graph as JSON
    Graph {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Show vault statistics
    Stats,
    /// Clear the saved conversation history
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MyceliaConfig::load_from(path)?,
        None => MyceliaConfig::load()?,
    };

    // Log to stderr so streamed replies on stdout stay clean.
    let filter = EnvFilter::try_new(&config.log.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Init => cli::init::init(&config).await?,
        Command::Chat => cli::chat::chat(Arc::new(config)).await?,
        Command::Graph { pretty } => cli::graph::graph(&config, pretty).await?,
        Command::Stats => cli::stats::stats(&config).await?,
        Command::Reset => cli::reset::reset(&config).await?,
    }

    Ok(())
}
