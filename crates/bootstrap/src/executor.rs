//! Single-transaction executor: build, sign, broadcast, confirm.

use std::time::Duration;

use alloy_primitives::{Address, Signature, U256, keccak256};
use alloy_rlp::{Encodable, Header};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use crate::error::{BootstrapError, Result};
use crate::nonce::NonceSequencer;
use crate::rpc::{ChainClient, Receipt};

/// Gas limit for construction transactions.
pub const DEPLOY_GAS_LIMIT: u64 = 8_000_000;

/// Gas limit for ordinary contract calls (mint, approve).
pub const CALL_GAS_LIMIT: u64 = 500_000;

/// Fixed gas price for every transaction: 20 gwei.
pub const DEFAULT_GAS_PRICE: u128 = 20_000_000_000;

/// The atomic unit of work: one legacy transaction from the single
/// signing account, executed to completion.
///
/// Each call to [`execute`](TxExecutor::execute) obtains a nonce from the
/// owned sequencer, signs an EIP-155 legacy transaction, broadcasts it and
/// blocks until the receipt confirms inclusion. Exactly one transaction is
/// outstanding at a time; the executor is never shared across tasks.
pub struct TxExecutor {
    client: ChainClient,
    signer: PrivateKeySigner,
    nonce: NonceSequencer,
    gas_price: u128,
    confirmation_timeout: Duration,
}

impl TxExecutor {
    pub fn new(
        client: ChainClient,
        signer: PrivateKeySigner,
        nonce: NonceSequencer,
        confirmation_timeout: Duration,
    ) -> Self {
        Self {
            client,
            signer,
            nonce,
            gas_price: DEFAULT_GAS_PRICE,
            confirmation_timeout,
        }
    }

    /// The signing account's address.
    pub fn account(&self) -> Address {
        self.signer.address()
    }

    /// Number of transactions submitted so far.
    pub fn transactions_sent(&self) -> u64 {
        self.nonce.issued()
    }

    /// Execute one transaction to completion and return its receipt.
    ///
    /// `to = None` is a construction transaction. A confirmed revert is
    /// reported as [`BootstrapError::SubmissionRejected`], same as a
    /// broadcast-time rejection: either way the run halts.
    pub async fn execute(
        &mut self,
        to: Option<Address>,
        data: Vec<u8>,
        gas_limit: u64,
    ) -> Result<Receipt> {
        let chain_id = self.client.chain_id();
        let tx = LegacyTx {
            nonce: self.nonce.current(),
            gas_price: self.gas_price,
            gas_limit,
            to,
            value: U256::ZERO,
            data,
        };

        let signing_hash = keccak256(tx.encode_for_signing(chain_id));
        let signature = self
            .signer
            .sign_hash_sync(&signing_hash)
            .map_err(|e| BootstrapError::Signing(e.to_string()))?;
        let raw = tx.encode_signed(chain_id, &signature);

        tracing::debug!(
            nonce = tx.nonce,
            to = ?tx.to,
            gas_limit = tx.gas_limit,
            payload_len = tx.data.len(),
            "Broadcasting transaction"
        );

        let tx_hash = self.client.send_raw_transaction(&raw).await?;
        let receipt = self
            .client
            .wait_for_receipt(tx_hash, self.confirmation_timeout)
            .await?;

        if !receipt.succeeded() {
            return Err(BootstrapError::SubmissionRejected {
                reason: format!("transaction {tx_hash} reverted"),
            });
        }

        tracing::debug!(tx_hash = %tx_hash, "Transaction confirmed");
        Ok(receipt)
    }
}

/// An unsigned legacy transaction.
struct LegacyTx {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: Option<Address>,
    value: U256,
    data: Vec<u8>,
}

impl LegacyTx {
    /// The `to` field as RLP sees it: 20 bytes, or empty for creation.
    fn to_field(&self) -> &[u8] {
        self.to.as_ref().map(|a| a.as_slice()).unwrap_or(&[])
    }

    fn fields_length(&self) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to_field().length()
            + self.value.length()
            + self.data[..].length()
    }

    fn encode_fields(&self, out: &mut Vec<u8>) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to_field().encode(out);
        self.value.encode(out);
        self.data[..].encode(out);
    }

    /// RLP encoding of the EIP-155 signing payload:
    /// `rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])`.
    fn encode_for_signing(&self, chain_id: u64) -> Vec<u8> {
        let payload_length = self.fields_length() + chain_id.length() + 0u8.length() * 2;

        let mut out = Vec::with_capacity(payload_length + 4);
        Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        self.encode_fields(&mut out);
        chain_id.encode(&mut out);
        0u8.encode(&mut out);
        0u8.encode(&mut out);
        out
    }

    /// RLP encoding of the signed transaction, with the EIP-155 recovery
    /// value `v = chainId * 2 + 35 + parity`.
    fn encode_signed(&self, chain_id: u64, signature: &Signature) -> Vec<u8> {
        let v = eip155_v(chain_id, signature.v());
        let r = signature.r();
        let s = signature.s();

        let payload_length = self.fields_length() + v.length() + r.length() + s.length();

        let mut out = Vec::with_capacity(payload_length + 4);
        Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        self.encode_fields(&mut out);
        v.encode(&mut out);
        r.encode(&mut out);
        s.encode(&mut out);
        out
    }
}

/// EIP-155 recovery value from the chain id and signature y-parity.
fn eip155_v(chain_id: u64, parity: bool) -> u64 {
    chain_id * 2 + 35 + u64::from(parity)
}
