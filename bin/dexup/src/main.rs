//! dexup is a CLI tool that bootstraps a DEX deployment on a development
//! chain: deploys the token, factory and router contracts, mints test
//! balances, creates the trading pair and seeds its liquidity.

mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use dexup_bootstrap::{Bootstrapper, DEXCONF_FILENAME};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    // If a config file is provided, load it; otherwise build from CLI
    // arguments.
    let bootstrapper = if let Some(config_path) = &cli.config {
        tracing::info!(
            config_path = %config_path.display(),
            "Loading bootstrap configuration from file..."
        );
        Bootstrapper::load_from_file(config_path)?
    } else {
        cli.to_bootstrapper()
    };

    // Validate whichever endpoint the run will actually use.
    url::Url::parse(&bootstrapper.rpc_url)
        .with_context(|| format!("Invalid RPC endpoint URL: {}", bootstrapper.rpc_url))?;

    if cli.save_config {
        bootstrapper.save_to_file(&PathBuf::from(DEXCONF_FILENAME))?;
    }

    let report = bootstrapper.run().await?;

    println!("{report}");

    Ok(())
}
