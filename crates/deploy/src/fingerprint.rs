use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::Deployer;

/// File name of the version metadata saved next to the address record.
pub const FINGERPRINT_FILENAME: &str = ".launch-version.json";

/// Configuration parameters that affect what gets deployed.
///
/// This struct contains only the parameters that, when changed, make a
/// recorded deployment stale. Runtime-only settings (verbosity, output
/// directories) are excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFingerprint {
    /// RPC endpoint the artifacts were deployed through.
    pub rpc_url: String,
    /// Crowdsale opening timestamp.
    pub sale_start: u64,
    /// Crowdsale closing timestamp.
    pub sale_end: u64,
    /// Token publication timestamp.
    pub publish_date: u64,
    /// Whether the staking artifact was part of the run.
    pub staking_enabled: bool,
}

impl RunFingerprint {
    /// Extract the deployment-relevant configuration from a Deployer.
    pub fn from_deployer(deployer: &Deployer) -> Self {
        Self {
            rpc_url: deployer.rpc_url.to_string(),
            sale_start: deployer.sale.start,
            sale_end: deployer.sale.end,
            publish_date: deployer.sale.publish,
            staking_enabled: deployer.staking_enabled,
        }
    }

    /// Compute a SHA-256 hash of this configuration.
    ///
    /// The configuration is serialized to JSON before hashing, so the same
    /// configuration always produces the same hash.
    pub fn compute_hash(&self) -> String {
        let json =
            serde_json::to_string(self).expect("RunFingerprint serialization should never fail");

        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Version metadata stored alongside the address record.
///
/// Saved to `{outdata}/.launch-version.json` after a successful run and used
/// to detect when configuration changes make the recorded addresses stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunVersion {
    /// SHA-256 hash of the run configuration.
    pub config_hash: String,
    /// Unix timestamp when the run completed.
    pub deployed_at: u64,
    /// Launchkit version that performed the run.
    pub launchkit_version: String,
}

impl RunVersion {
    pub fn new(config_hash: String) -> Self {
        Self {
            config_hash,
            deployed_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("System time should be after Unix epoch")
                .as_secs(),
            launchkit_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Save this version metadata as formatted JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run version")?;

        std::fs::write(path, json)
            .context(format!("Failed to write run version to {}", path.display()))?;

        Ok(())
    }

    /// Load version metadata from a file.
    ///
    /// Returns an error if the file doesn't exist, is malformed, or cannot
    /// be read.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Run version file does not exist: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read run version from {}", path.display()))?;

        let version: Self =
            serde_json::from_str(&content).context("Failed to parse run version JSON")?;

        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn sample() -> RunFingerprint {
        RunFingerprint {
            rpc_url: "http://localhost:8545/".to_string(),
            sale_start: 1737316800,
            sale_end: 1738526400,
            publish_date: 1738612800,
            staking_enabled: false,
        }
    }

    #[test]
    fn hash_is_deterministic() {
        let fingerprint = sample();
        let hash1 = fingerprint.compute_hash();
        let hash2 = fingerprint.compute_hash();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64, "SHA-256 hash should be 64 hex characters");
    }

    #[test]
    fn hash_changes_with_sale_schedule() {
        let fingerprint1 = sample();
        let mut fingerprint2 = fingerprint1.clone();
        fingerprint2.sale_end += 3600;

        assert_ne!(fingerprint1.compute_hash(), fingerprint2.compute_hash());
    }

    #[test]
    fn hash_changes_with_staking_flag() {
        let fingerprint1 = sample();
        let mut fingerprint2 = fingerprint1.clone();
        fingerprint2.staking_enabled = true;

        assert_ne!(fingerprint1.compute_hash(), fingerprint2.compute_hash());
    }

    #[test]
    fn version_save_and_load() {
        let temp_dir = TempDir::new("launchkit-test").expect("Failed to create temp dir");
        let version_path = temp_dir.path().join(FINGERPRINT_FILENAME);

        let original = RunVersion {
            config_hash: "a7f3c2b1d8e5f4a9b2c3d4e5f6a7b8c9".to_string(),
            deployed_at: 1737316800,
            launchkit_version: "0.1.0".to_string(),
        };

        original
            .save_to_file(&version_path)
            .expect("Failed to save version");
        let loaded = RunVersion::load_from_file(&version_path).expect("Failed to load version");

        assert_eq!(original, loaded);
    }

    #[test]
    fn version_load_missing_file() {
        let temp_dir = TempDir::new("launchkit-test").expect("Failed to create temp dir");
        let result = RunVersion::load_from_file(&temp_dir.path().join("nonexistent.json"));
        assert!(result.is_err());
    }

    #[test]
    fn version_load_corrupted_file() {
        let temp_dir = TempDir::new("launchkit-test").expect("Failed to create temp dir");
        let version_path = temp_dir.path().join(FINGERPRINT_FILENAME);

        std::fs::write(&version_path, "{ invalid json }").expect("Failed to write corrupted file");

        assert!(RunVersion::load_from_file(&version_path).is_err());
    }
}
