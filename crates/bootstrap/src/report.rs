//! Read-only state verification and the final run report.

use std::fmt;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;

use crate::abi::{IDexFactory, IDexPair, IErc20};
use crate::error::{BootstrapError, Result};
use crate::rpc::{ChainClient, format_units};

/// Read-only queries against deployed contracts.
///
/// No nonce, no signing, no side effects: every method is a view call
/// through the connection, used after mutation stages to surface
/// observable state.
pub struct StateReporter {
    client: ChainClient,
}

impl StateReporter {
    pub fn new(client: ChainClient) -> Self {
        Self { client }
    }

    /// Token balance of an account, in base units.
    pub async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        let data = self
            .client
            .call(token, IErc20::balanceOfCall { owner }.abi_encode())
            .await?;
        IErc20::balanceOfCall::abi_decode_returns(&data).map_err(|e| decode_err("balanceOf", e))
    }

    /// Pair address the factory derived for a token pair.
    ///
    /// Returns whatever the factory reports, including the zero address;
    /// the caller decides whether zero is a dependency failure.
    pub async fn pair_address(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address> {
        let data = self
            .client
            .call(
                factory,
                IDexFactory::getPairCall {
                    tokenA: token_a,
                    tokenB: token_b,
                }
                .abi_encode(),
            )
            .await?;
        IDexFactory::getPairCall::abi_decode_returns(&data).map_err(|e| decode_err("getPair", e))
    }

    /// Current pool reserves, in the pair's canonical token order.
    pub async fn reserves(&self, pair: Address) -> Result<(U256, U256)> {
        let data = self
            .client
            .call(pair, IDexPair::getReservesCall {}.abi_encode())
            .await?;
        let ret = IDexPair::getReservesCall::abi_decode_returns(&data)
            .map_err(|e| decode_err("getReserves", e))?;

        Ok((
            U256::from(ret.reserve0.to::<u128>()),
            U256::from(ret.reserve1.to::<u128>()),
        ))
    }
}

fn decode_err(what: &str, e: alloy_sol_types::Error) -> BootstrapError {
    BootstrapError::Decode {
        what: what.to_string(),
        reason: e.to_string(),
    }
}

/// Everything a successful bootstrap run produced, printed as the final
/// human-readable summary.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// The signing account.
    pub account: Address,
    pub token_a: Address,
    pub token_b: Address,
    pub factory: Address,
    pub router: Address,
    pub pair: Address,
    /// Account balances after minting, in base units.
    pub balance_a: U256,
    pub balance_b: U256,
    /// Pool reserves after liquidity provisioning, in base units.
    pub reserve0: U256,
    pub reserve1: U256,
    /// Total transactions submitted by the run.
    pub transactions: u64,
}

impl fmt::Display for BootstrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Deployed contracts ===")?;
        writeln!(f, "  TokenA:  {}", self.token_a)?;
        writeln!(f, "  TokenB:  {}", self.token_b)?;
        writeln!(f, "  Factory: {}", self.factory)?;
        writeln!(f, "  Router:  {}", self.router)?;
        writeln!(f, "  Pair:    {}", self.pair)?;
        writeln!(f)?;

        writeln!(f, "=== Account {} ===", self.account)?;
        writeln!(f, "  TokenA balance: {}", format_units(self.balance_a))?;
        writeln!(f, "  TokenB balance: {}", format_units(self.balance_b))?;
        writeln!(f)?;

        writeln!(f, "=== Pool reserves ===")?;
        writeln!(f, "  reserve0: {}", format_units(self.reserve0))?;
        writeln!(f, "  reserve1: {}", format_units(self.reserve1))?;
        writeln!(f)?;

        write!(f, "Bootstrap complete ({} transactions)", self.transactions)
    }
}
