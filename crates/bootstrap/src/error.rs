//! Error taxonomy for the bootstrap pipeline.
//!
//! Every variant is fatal to the run: there is no retry, no gas escalation
//! and no checkpoint/resume. The only recovery path is a fresh run with a
//! re-queried nonce.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BootstrapError>;

/// Fatal failures of a bootstrap run.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The chain endpoint could not be reached or did not answer the
    /// startup connectivity check. Raised before any transaction is built.
    #[error("cannot reach chain endpoint: {reason}")]
    Connectivity { reason: String },

    /// The signing credential is malformed or the transaction could not
    /// be signed.
    #[error("failed to sign transaction: {0}")]
    Signing(String),

    /// The network rejected a signed transaction (bad nonce, insufficient
    /// funds, gas too low) or the transaction confirmed with a revert.
    #[error("transaction rejected by the network: {reason}")]
    SubmissionRejected { reason: String },

    /// The bounded confirmation wait expired without a receipt. Distinct
    /// from rejection: the transaction may still land later.
    #[error("no receipt for transaction {tx_hash} after {waited_secs}s")]
    ConfirmationTimeout { tx_hash: String, waited_secs: u64 },

    /// A construction transaction confirmed but its receipt carries no
    /// contract address (the constructor reverted).
    #[error("deployment of {name} confirmed but yielded no contract address")]
    DeploymentFailed { name: String },

    /// A stage references an address or state a prior stage failed to
    /// produce, e.g. a zero pair address after pair creation.
    #[error("dependency unresolved: {0}")]
    DependencyUnresolved(String),

    /// A contract artifact file could not be read or is missing the
    /// required `abi`/`bytecode` fields.
    #[error("invalid contract artifact {path}: {reason}")]
    Artifact { path: String, reason: String },

    /// HTTP-level failure while talking to the endpoint mid-run.
    #[error("RPC transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered a request with a JSON-RPC error object.
    #[error("RPC error from {method}: {message}")]
    Rpc { method: String, message: String },

    /// The node answered with a payload we could not interpret.
    #[error("unexpected {method} response: {reason}")]
    Response { method: String, reason: String },

    /// Return data of a view call did not decode against the fixed ABI.
    #[error("failed to decode {what} return data: {reason}")]
    Decode { what: String, reason: String },

    /// Configuration file could not be read, written or parsed.
    #[error("configuration file error: {0}")]
    ConfigFile(String),
}
