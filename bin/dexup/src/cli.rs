use std::path::PathBuf;

use clap::Parser;
use dexup_bootstrap::{ArtifactPaths, Bootstrapper};
use tracing::level_filters::LevelFilter;

/// Default signing key: Hardhat/Anvil development account 0. Only ever
/// meaningful against a local development node.
const DEFAULT_DEV_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(Parser)]
#[command(name = "dexup")]
#[command(
    author,
    version,
    about = "Bootstrap a DEX deployment: deploy contracts, mint tokens, create a pair and seed liquidity"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "DEXUP_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The URL of the chain's JSON-RPC endpoint.
    #[arg(long, alias = "rpc", env = "DEXUP_RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    /// Hex-encoded private key of the bootstrap account.
    #[arg(long, env = "DEXUP_PRIVATE_KEY", default_value = DEFAULT_DEV_KEY)]
    pub private_key: String,

    /// Directory containing the compiled contract artifacts
    /// (Hardhat layout: `<Name>.sol/<Name>.json`).
    #[arg(long, env = "DEXUP_ARTIFACTS", default_value = "artifacts/contracts")]
    pub artifacts_dir: PathBuf,

    /// Supply passed to each token constructor, in display units.
    #[arg(long, env = "DEXUP_INITIAL_SUPPLY", default_value_t = 1_000_000)]
    pub initial_supply: u64,

    /// Amount minted to the account per token, in display units.
    #[arg(long, env = "DEXUP_MINT_AMOUNT", default_value_t = 2000)]
    pub mint_amount: u64,

    /// Allowance granted to the router per token, in display units.
    #[arg(long, env = "DEXUP_APPROVE_AMOUNT", default_value_t = 1000)]
    pub approve_amount: u64,

    /// Amount of each token supplied to the pool, in display units.
    /// Must not exceed the approved amount.
    #[arg(long, env = "DEXUP_LIQUIDITY_AMOUNT", default_value_t = 1000)]
    pub liquidity_amount: u64,

    /// Maximum seconds to wait for each transaction's receipt.
    #[arg(long, env = "DEXUP_CONFIRMATION_TIMEOUT", default_value_t = 60)]
    pub confirmation_timeout: u64,

    /// Path to an existing Dexup.toml configuration file to load.
    ///
    /// When provided, the run uses the configuration from this file
    /// instead of building one from CLI arguments.
    #[arg(long, alias = "conf", env = "DEXUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the resolved configuration to Dexup.toml before running.
    #[arg(long, env = "DEXUP_SAVE_CONFIG")]
    pub save_config: bool,
}

impl Cli {
    /// Build a bootstrapper from the CLI arguments.
    pub fn to_bootstrapper(&self) -> Bootstrapper {
        Bootstrapper {
            rpc_url: self.rpc_url.clone(),
            private_key: self.private_key.clone(),
            artifacts: ArtifactPaths {
                erc20: self.artifacts_dir.join("MockERC20.sol/MockERC20.json"),
                factory: self.artifacts_dir.join("DexFactory.sol/DexFactory.json"),
                router: self.artifacts_dir.join("DexRouter.sol/DexRouter.json"),
            },
            initial_supply: self.initial_supply,
            mint_amount: self.mint_amount,
            approve_amount: self.approve_amount,
            liquidity_amount: self.liquidity_amount,
            confirmation_timeout_secs: self.confirmation_timeout,
        }
    }
}
