//! The bootstrap pipeline: ordered deploy / mint / pair / liquidity stages.

use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolCall, SolValue};
use serde::{Deserialize, Serialize};

use crate::abi::{IDexFactory, IDexRouter, IErc20};
use crate::artifact::Artifact;
use crate::deployer::deploy_contract;
use crate::error::{BootstrapError, Result};
use crate::executor::{CALL_GAS_LIMIT, DEPLOY_GAS_LIMIT, TxExecutor};
use crate::nonce::NonceSequencer;
use crate::report::{BootstrapReport, StateReporter};
use crate::rpc::{ChainClient, format_units, to_base_units};

/// The default name for the dexup configuration file.
pub const DEXCONF_FILENAME: &str = "Dexup.toml";

/// Artifact file per deployable contract. TokenA and TokenB share the
/// ERC-20 artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub erc20: PathBuf,
    pub factory: PathBuf,
    pub router: PathBuf,
}

/// Full configuration of a bootstrap run.
///
/// All token amounts are display units (1 token = 10^18 base units).
/// Serializable to TOML so a run can be reproduced from a saved file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bootstrapper {
    /// JSON-RPC endpoint of the target chain.
    pub rpc_url: String,
    /// Hex-encoded signing key for the single bootstrap account.
    pub private_key: String,
    /// Compiled contract artifacts.
    pub artifacts: ArtifactPaths,
    /// Supply passed to each token constructor.
    pub initial_supply: u64,
    /// Amount minted to the account per token after deployment.
    pub mint_amount: u64,
    /// Allowance granted to the router per token.
    pub approve_amount: u64,
    /// Amount of each token supplied to the pool. Must not exceed
    /// `approve_amount` or the router rejects the transfer.
    pub liquidity_amount: u64,
    /// Bounded per-transaction confirmation wait, in seconds.
    pub confirmation_timeout_secs: u64,
}

impl Bootstrapper {
    /// Save the configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BootstrapError::ConfigFile(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| {
            BootstrapError::ConfigFile(format!("failed to write {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Load the configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BootstrapError::ConfigFile(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self =
            toml::from_str(&content).map_err(|e| BootstrapError::ConfigFile(e.to_string()))?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Run the full bootstrap sequence.
    ///
    /// Stages execute strictly in order, one outstanding transaction at a
    /// time; every stage's receipts must confirm before the next stage
    /// issues anything that depends on them. Any error aborts the run;
    /// the last logged stage tells the operator where it stopped.
    pub async fn run(&self) -> Result<BootstrapReport> {
        tracing::info!(rpc_url = %self.rpc_url, "Connecting to chain...");
        let client = ChainClient::connect(&self.rpc_url).await?;
        tracing::info!(chain_id = client.chain_id(), "Connected");

        let signer: PrivateKeySigner = self
            .private_key
            .parse()
            .map_err(|e: alloy_signer_local::LocalSignerError| {
                BootstrapError::Signing(e.to_string())
            })?;
        let account = signer.address();
        tracing::info!(account = %account, "Using account");

        let nonce = NonceSequencer::seed(&client, account).await?;
        let mut executor = TxExecutor::new(
            client.clone(),
            signer,
            nonce,
            Duration::from_secs(self.confirmation_timeout_secs),
        );
        let reporter = StateReporter::new(client.clone());

        // Artifacts are loaded up front so a missing file fails the run
        // before any transaction is issued.
        let erc20 = Artifact::load(&self.artifacts.erc20)?;
        let factory_artifact = Artifact::load(&self.artifacts.factory)?;
        let router_artifact = Artifact::load(&self.artifacts.router)?;

        tracing::info!("=== Deploying core contracts ===");
        let supply = to_base_units(self.initial_supply);
        let token_a = deploy_contract(
            &mut executor,
            "TokenA",
            &erc20,
            &("TokenA", "TKA", supply).abi_encode_params(),
        )
        .await?;
        let token_b = deploy_contract(
            &mut executor,
            "TokenB",
            &erc20,
            &("TokenB", "TKB", supply).abi_encode_params(),
        )
        .await?;
        let factory = deploy_contract(&mut executor, "DexFactory", &factory_artifact, &[]).await?;
        let router = deploy_contract(
            &mut executor,
            "DexRouter",
            &router_artifact,
            &factory.abi_encode(),
        )
        .await?;

        tracing::info!("=== Minting tokens ===");
        let mint_amount = to_base_units(self.mint_amount);
        for token in [token_a, token_b] {
            let calldata = IErc20::mintCall {
                to: account,
                amount: mint_amount,
            }
            .abi_encode();
            executor.execute(Some(token), calldata, CALL_GAS_LIMIT).await?;
        }

        let balance_a = reporter.balance_of(token_a, account).await?;
        let balance_b = reporter.balance_of(token_b, account).await?;
        tracing::info!(
            token_a = %format_units(balance_a),
            token_b = %format_units(balance_b),
            "Account balances"
        );

        tracing::info!("=== Creating liquidity pair ===");
        let create_pair = IDexFactory::createPairCall {
            tokenA: token_a,
            tokenB: token_b,
        }
        .abi_encode();
        executor
            .execute(Some(factory), create_pair, DEPLOY_GAS_LIMIT)
            .await?;

        // The lookup is only meaningful after the create call confirmed.
        // A zero address means the pair was never materialized; it must
        // never leak into later stages as a valid-looking target.
        let pair = reporter.pair_address(factory, token_a, token_b).await?;
        if pair == Address::ZERO {
            return Err(BootstrapError::DependencyUnresolved(
                "factory returned the zero address for the created pair".to_string(),
            ));
        }
        tracing::info!(pair = %pair, "Pair created");

        tracing::info!("=== Approving router ===");
        let approve_amount = to_base_units(self.approve_amount);
        for token in [token_a, token_b] {
            let calldata = IErc20::approveCall {
                spender: router,
                amount: approve_amount,
            }
            .abi_encode();
            executor.execute(Some(token), calldata, CALL_GAS_LIMIT).await?;
        }

        tracing::info!("=== Adding liquidity ===");
        let liquidity = to_base_units(self.liquidity_amount);
        let add_liquidity = IDexRouter::addLiquidityCall {
            tokenA: token_a,
            tokenB: token_b,
            amountADesired: liquidity,
            amountBDesired: liquidity,
        }
        .abi_encode();
        executor
            .execute(Some(router), add_liquidity, DEPLOY_GAS_LIMIT)
            .await?;

        let (reserve0, reserve1) = reporter.reserves(pair).await?;
        tracing::info!(
            reserve0 = %format_units(reserve0),
            reserve1 = %format_units(reserve1),
            "Pool reserves"
        );

        Ok(BootstrapReport {
            account,
            token_a,
            token_b,
            factory,
            router,
            pair,
            balance_a,
            balance_b,
            reserve0,
            reserve1,
            transactions: executor.transactions_sent(),
        })
    }
}
