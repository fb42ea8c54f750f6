//! Compiled contract build artifacts.
//!
//! Each deployable contract ships as `configs/artifacts/<Name>.json` holding
//! its creation bytecode. Constructor arguments are ABI-encoded and appended
//! to the bytecode to form the creation transaction payload.

use std::path::Path;

use alloy_core::primitives::Bytes;
use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::abi::Word;

/// Subdirectory of the configs directory holding the artifact files.
pub const ARTIFACTS_DIR: &str = "artifacts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    /// Creation bytecode, 0x-prefixed hex.
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Load the build artifact for a contract by name.
    pub fn load(configs: &Path, name: &str) -> Result<Self, anyhow::Error> {
        let path = configs.join(ARTIFACTS_DIR).join(format!("{}.json", name));
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read contract artifact {}", path.display()))?;
        let artifact: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse contract artifact {}", path.display()))?;

        if artifact.bytecode.is_empty() {
            anyhow::bail!("Contract artifact '{}' has empty bytecode", name);
        }

        Ok(artifact)
    }

    /// Creation payload: bytecode followed by the encoded constructor arguments.
    pub fn creation_data(&self, constructor_args: &[Word]) -> Bytes {
        let mut data = Vec::with_capacity(self.bytecode.len() + 32 * constructor_args.len());
        data.extend_from_slice(&self.bytecode);
        for word in constructor_args {
            data.extend_from_slice(word);
        }
        Bytes::from(data)
    }
}
