//! Persisted record of deployed contract addresses.
//!
//! The record is the sole idempotence gate: once an artifact has an address
//! here, later runs bind to it instead of redeploying. There is no on-chain
//! verification that the recorded address still hosts code.

use std::path::Path;

use alloy_core::primitives::Address;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// File name of the contract address record, inside the output data directory.
pub const RECORD_FILENAME: &str = "contracts.json";

/// Addresses of the four launch artifacts. Absent key means "not yet deployed".
///
/// Fixed struct fields (not a map) so a no-op rerun re-serializes
/// byte-identical content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContracts {
    #[serde(rename = "Token", skip_serializing_if = "Option::is_none")]
    pub token: Option<Address>,
    #[serde(rename = "VestingFactory", skip_serializing_if = "Option::is_none")]
    pub vesting_factory: Option<Address>,
    #[serde(rename = "Crowdsale", skip_serializing_if = "Option::is_none")]
    pub crowdsale: Option<Address>,
    #[serde(rename = "Staking", skip_serializing_if = "Option::is_none")]
    pub staking: Option<Address>,
}

impl DeployedContracts {
    /// Load the record, treating a missing file as an empty record (first run).
    pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No contract record yet, starting empty");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read contract record from {}", path.display()))?;
        serde_json::from_str(&content).context("Failed to parse contract record JSON")
    }

    /// Rewrite the record in full.
    pub fn save(&self, path: &Path) -> Result<(), anyhow::Error> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize contract record")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write contract record to {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Contract record persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_empty_record() {
        let dir = tempdir::TempDir::new("launchkit-record").unwrap();
        let record = DeployedContracts::load(&dir.path().join(RECORD_FILENAME)).unwrap();
        assert_eq!(record, DeployedContracts::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir::TempDir::new("launchkit-record").unwrap();
        let path = dir.path().join(RECORD_FILENAME);

        let record = DeployedContracts {
            token: Some(Address::repeat_byte(0x01)),
            vesting_factory: Some(Address::repeat_byte(0x02)),
            crowdsale: None,
            staking: None,
        };
        record.save(&path).unwrap();

        let loaded = DeployedContracts::load(&path).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        let dir = tempdir::TempDir::new("launchkit-record").unwrap();
        let path = dir.path().join(RECORD_FILENAME);

        let record = DeployedContracts {
            token: Some(Address::repeat_byte(0x01)),
            vesting_factory: Some(Address::repeat_byte(0x02)),
            crowdsale: Some(Address::repeat_byte(0x03)),
            staking: Some(Address::repeat_byte(0x04)),
        };
        record.save(&path).unwrap();
        let first = std::fs::read(&path).unwrap();

        // A run that deploys nothing loads and rewrites the same record.
        DeployedContracts::load(&path).unwrap().save(&path).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_absent_keys_are_omitted() {
        let record = DeployedContracts {
            token: Some(Address::repeat_byte(0x01)),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("Token"));
        assert!(!json.contains("Crowdsale"));
    }
}
