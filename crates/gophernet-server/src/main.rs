//! GopherNet server binary
//!
//! Loads configuration, installs the logger and runs the burrow API until
//! a shutdown signal arrives.

use anyhow::Context;
use clap::Parser;
use gophernet_server::{config::ServiceConfig, logging::init_tracing, start_server};
use std::path::PathBuf;
use std::process;

/// GopherNet - burrow rental service
#[derive(Debug, Parser)]
#[command(name = "gophernet", version, about)]
struct Cli {
    /// Path to the initial state file
    #[arg(long = "dataFile", value_name = "PATH", default_value = "data/state.json")]
    data_file: PathBuf,

    /// Configuration file (defaults to config/<GOPHERNET_ENV>.toml)
    #[arg(long, value_name = "PATH", env = "GOPHERNET_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ServiceConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.logging)?;

    start_server(config, cli.data_file).await?;

    Ok(())
}
