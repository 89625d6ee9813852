//! Contract deployment on top of the transaction executor.

use alloy_primitives::Address;

use crate::artifact::Artifact;
use crate::error::{BootstrapError, Result};
use crate::executor::{DEPLOY_GAS_LIMIT, TxExecutor};

/// Deploy a contract and return its on-chain address.
///
/// The construction payload is the artifact bytecode followed by the
/// ABI-encoded constructor arguments. A receipt without a contract address
/// means the constructor reverted and fails the run with
/// [`BootstrapError::DeploymentFailed`].
pub async fn deploy_contract(
    executor: &mut TxExecutor,
    name: &str,
    artifact: &Artifact,
    constructor_args: &[u8],
) -> Result<Address> {
    let mut payload = artifact.bytecode.clone();
    payload.extend_from_slice(constructor_args);

    tracing::info!(contract = name, payload_len = payload.len(), "Deploying contract...");

    let receipt = executor.execute(None, payload, DEPLOY_GAS_LIMIT).await?;

    let address = receipt
        .contract_address
        .ok_or_else(|| BootstrapError::DeploymentFailed {
            name: name.to_string(),
        })?;

    tracing::info!(contract = name, address = %address, "Contract deployed");
    Ok(address)
}
