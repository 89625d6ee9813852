//! JSON-RPC connection to the target chain.
//!
//! The [`ChainClient`] is the only component that talks to the network. It
//! exposes the handful of operations the pipeline needs: a connectivity
//! check, nonce queries, raw-transaction broadcast, receipt polling and
//! read-only contract calls.

use std::time::{Duration, Instant};

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{BootstrapError, Result};

/// Timeout for a single RPC request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Interval between receipt polling attempts.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Base units per display unit (18-decimal fixed scale).
const BASE_UNITS_PER_TOKEN: u64 = 1_000_000_000_000_000_000;

/// Chain-confirmed outcome of a submitted transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Hash of the confirmed transaction.
    pub transaction_hash: B256,
    /// Execution status: `0x1` on success, `0x0` on revert.
    pub status: Option<String>,
    /// Address of the created contract, present only for deployments.
    pub contract_address: Option<Address>,
    /// Block the transaction was included in (hex).
    pub block_number: Option<String>,
}

impl Receipt {
    /// Whether the transaction executed successfully.
    pub fn succeeded(&self) -> bool {
        matches!(self.status.as_deref(), Some("0x1"))
    }
}

/// Handle to an Ethereum JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct ChainClient {
    client: reqwest::Client,
    url: String,
    chain_id: u64,
}

impl ChainClient {
    /// Connect to an RPC endpoint and verify it answers.
    ///
    /// Performs `eth_chainId` as the connectivity check; any failure here
    /// aborts the run before a single transaction is built. The returned
    /// chain id is retained for EIP-155 signing.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BootstrapError::Connectivity {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        let mut this = Self {
            client,
            url: url.to_string(),
            chain_id: 0,
        };

        let chain_id_hex: String = this
            .rpc("eth_chainId", vec![])
            .await
            .map_err(|e| BootstrapError::Connectivity {
                reason: e.to_string(),
            })?;
        this.chain_id = parse_hex_u64(&chain_id_hex).ok_or_else(|| {
            BootstrapError::Connectivity {
                reason: format!("endpoint returned malformed chain id: {chain_id_hex}"),
            }
        })?;

        Ok(this)
    }

    /// The chain id reported by the endpoint at connect time.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Current transaction count for an account, used to seed the nonce
    /// sequencer.
    pub async fn transaction_count(&self, account: Address) -> Result<u64> {
        let count_hex: String = self
            .rpc(
                "eth_getTransactionCount",
                vec![serde_json::json!(account), serde_json::json!("latest")],
            )
            .await?;
        parse_hex_u64(&count_hex).ok_or_else(|| BootstrapError::Response {
            method: "eth_getTransactionCount".to_string(),
            reason: format!("malformed count: {count_hex}"),
        })
    }

    /// Broadcast a signed raw transaction.
    ///
    /// A JSON-RPC error here means the network refused the transaction
    /// (bad nonce, insufficient funds, gas too low); it is surfaced as
    /// [`BootstrapError::SubmissionRejected`] with the node's reason.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256> {
        let param = format!("0x{}", hex::encode(raw));
        let hash: B256 = self
            .rpc("eth_sendRawTransaction", vec![serde_json::json!(param)])
            .await
            .map_err(|e| match e {
                BootstrapError::Rpc { message, .. } => {
                    BootstrapError::SubmissionRejected { reason: message }
                }
                other => other,
            })?;
        Ok(hash)
    }

    /// Block until the transaction is included, with a bounded wait.
    ///
    /// Polls `eth_getTransactionReceipt` at a fixed interval; expiry is a
    /// [`BootstrapError::ConfirmationTimeout`], reported distinctly from a
    /// rejection since the transaction may still land later.
    pub async fn wait_for_receipt(&self, tx_hash: B256, timeout: Duration) -> Result<Receipt> {
        let start = Instant::now();

        loop {
            let value: Value = self
                .rpc("eth_getTransactionReceipt", vec![serde_json::json!(tx_hash)])
                .await?;

            if !value.is_null() {
                return serde_json::from_value(value).map_err(|e| BootstrapError::Response {
                    method: "eth_getTransactionReceipt".to_string(),
                    reason: e.to_string(),
                });
            }

            if start.elapsed() > timeout {
                return Err(BootstrapError::ConfirmationTimeout {
                    tx_hash: tx_hash.to_string(),
                    waited_secs: timeout.as_secs(),
                });
            }

            tracing::trace!(tx_hash = %tx_hash, "Receipt not yet available, retrying...");
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }

    /// Execute a read-only contract call against the latest block and
    /// return the raw return data.
    pub async fn call(&self, to: Address, calldata: Vec<u8>) -> Result<Vec<u8>> {
        let result: String = self
            .rpc(
                "eth_call",
                vec![
                    serde_json::json!({
                        "to": to,
                        "data": format!("0x{}", hex::encode(calldata)),
                    }),
                    serde_json::json!("latest"),
                ],
            )
            .await?;

        hex::decode(result.trim_start_matches("0x")).map_err(|e| BootstrapError::Response {
            method: "eth_call".to_string(),
            reason: format!("malformed return data: {e}"),
        })
    }

    /// Make a JSON-RPC call and deserialize the result.
    async fn rpc<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "method": method,
                "params": params,
                "id": 1
            }))
            .send()
            .await?;

        let result: Value = response.json().await?;

        if let Some(error) = result.get("error") {
            return Err(BootstrapError::Rpc {
                method: method.to_string(),
                message: error
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("unknown")
                    .to_string(),
            });
        }

        let result_value = result
            .get("result")
            .ok_or_else(|| BootstrapError::Response {
                method: method.to_string(),
                reason: "no result in response".to_string(),
            })?
            .clone();

        serde_json::from_value(result_value).map_err(|e| BootstrapError::Response {
            method: method.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Parse a 0x-prefixed hex quantity into a u64.
pub(crate) fn parse_hex_u64(s: &str) -> Option<u64> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16).ok()
}

/// Convert a display-unit token amount to 18-decimal base units.
pub fn to_base_units(display: u64) -> U256 {
    U256::from(display) * U256::from(BASE_UNITS_PER_TOKEN)
}

/// Format a base-unit amount as a display-unit string.
///
/// Integral amounts render without a fractional part, so the
/// display → base → display round trip is exact for whole tokens.
pub fn format_units(amount: U256) -> String {
    let scale = U256::from(BASE_UNITS_PER_TOKEN);
    let integral = amount / scale;
    let remainder = amount % scale;

    if remainder.is_zero() {
        return integral.to_string();
    }

    let frac = format!("{:0>18}", remainder.to_string());
    format!("{}.{}", integral, frac.trim_end_matches('0'))
}
