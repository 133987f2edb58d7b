//! newsdigest CLI: daily tech-news collection, enrichment and archiving.
//!
//! Collects the latest articles from configured feeds, adds summaries and
//! study questions, merges them into long-lived stores, and renders the
//! archive as a standalone HTML page.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
