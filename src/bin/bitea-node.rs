#![forbid(unsafe_code)]
//! Bitea ledger node: mines the genesis block and serves the REST API

use bitea_chain::api::run_api_server;
use bitea_chain::blockchain::Ledger;
use bitea_chain::config::{load_config_from, DEFAULT_CONFIG_PATH};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Leading zero hex characters required of each block hash
    #[arg(long)]
    difficulty: Option<u32>,
    /// Pending transactions that trigger an automatic mine
    #[arg(long)]
    batch_size: Option<usize>,
    /// API listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = load_config_from(&cli.config)?;
    if let Some(difficulty) = cli.difficulty {
        config.ledger.difficulty = difficulty;
    }
    if let Some(batch_size) = cli.batch_size {
        config.ledger.max_transactions_per_block = batch_size;
    }
    if let Some(port) = cli.port {
        config.api.port = port;
    }
    config.validate()?;

    println!("{}", "=== Bitea Social Media Blockchain ===".bright_cyan().bold());
    println!("{}", "Mining genesis block...".yellow());

    let ledger_config = config.ledger.clone();
    let ledger = tokio::task::spawn_blocking(move || Ledger::from_config(&ledger_config)).await??;

    println!("{}", "Blockchain initialized with genesis block".bright_green());
    println!("{}", ledger.info());

    run_api_server(ledger, &config.api).await
}
