//! CLI entry point for the interactive downloader.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use interactive_downloader::ConsoleReporter;
use interactive_downloader::app::run_session;
use tokio::io::BufReader;
use tracing::{debug, info};

mod cli;
mod terminal;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    terminal::setup(&args);

    debug!(?args, "CLI arguments parsed");
    info!("Downloader starting");

    let config = args.to_config();
    let input = BufReader::new(tokio::io::stdin());
    let mut prompt_out = std::io::stdout();

    let exit = run_session(config, Arc::new(ConsoleReporter), input, &mut prompt_out).await?;

    info!(?exit, "Downloader stopped");
    Ok(())
}
