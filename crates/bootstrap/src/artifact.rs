//! Compiled contract artifact loading.

use std::path::Path;

use serde_json::Value;

use crate::error::{BootstrapError, Result};

/// Immutable description of a deployable contract: its ABI document and
/// deployment bytecode, loaded from a Hardhat-style JSON file.
///
/// The artifact is treated as an opaque input: beyond requiring the `abi`
/// and `bytecode` fields to parse, no validation is performed.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// The ABI document, kept verbatim.
    pub abi: Value,
    /// Decoded deployment bytecode.
    pub bytecode: Vec<u8>,
}

impl Artifact {
    /// Load an artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let err = |reason: String| BootstrapError::Artifact {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| err(format!("failed to read file: {e}")))?;
        let doc: Value =
            serde_json::from_str(&content).map_err(|e| err(format!("failed to parse JSON: {e}")))?;

        let abi = doc
            .get("abi")
            .cloned()
            .ok_or_else(|| err("missing `abi` field".to_string()))?;

        let bytecode_hex = doc
            .get("bytecode")
            .and_then(|v| v.as_str())
            .ok_or_else(|| err("missing `bytecode` field".to_string()))?;
        let bytecode = hex::decode(bytecode_hex.trim_start_matches("0x"))
            .map_err(|e| err(format!("malformed bytecode hex: {e}")))?;

        tracing::debug!(
            path = %path.display(),
            bytecode_len = bytecode.len(),
            "Artifact loaded"
        );

        Ok(Self { abi, bytecode })
    }
}
