//! dexup-bootstrap - Bootstrap library for a DEX deployment.
//!
//! This crate provides the transactional orchestration engine that deploys
//! the DEX contracts, mints test tokens, creates a trading pair, provisions
//! liquidity and verifies the resulting pool state, one confirmed
//! transaction at a time.

pub mod abi;

mod artifact;
pub use artifact::Artifact;

mod deployer;
pub use deployer::deploy_contract;

mod error;
pub use error::{BootstrapError, Result};

mod executor;
pub use executor::{CALL_GAS_LIMIT, DEFAULT_GAS_PRICE, DEPLOY_GAS_LIMIT, TxExecutor};

mod nonce;
pub use nonce::NonceSequencer;

mod pipeline;
pub use pipeline::{ArtifactPaths, Bootstrapper, DEXCONF_FILENAME};

mod report;
pub use report::{BootstrapReport, StateReporter};

mod rpc;
pub use rpc::{ChainClient, Receipt, format_units, to_base_units};
