//! Read-only JSON input documents for a launch run.
//!
//! All four documents live in the configs directory and keep the field names
//! the operations team already maintains (`day1Percent`, `lockTime`, ...).

use std::{collections::BTreeMap, path::Path};

use alloy_core::primitives::{Address, U256};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// File name of the distributions document.
pub const DISTRIBUTIONS_FILENAME: &str = "distributions.json";
/// File name of the crowdsale whitelist document.
pub const WHITELIST_FILENAME: &str = "whitelist.json";
/// File name of the staking parameters document.
pub const STAKING_FILENAME: &str = "staking.json";

/// A single vesting recipient within a distribution plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub name: String,
    pub address: Address,
    /// Whole-token amount; scaled to base units by the distribution engine.
    pub amount: u64,
}

/// A named vesting group (team, advisors, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionPlan {
    /// Vesting start time (unix timestamp).
    pub t0: u64,
    /// Cliff/reference time (unix timestamp).
    pub t1: u64,
    /// Percentage released at the reference time, 0..=100.
    pub day1_percent: u8,
    /// Vesting duration in seconds.
    pub duration: u64,
    /// Processed strictly in list order.
    pub beneficiaries: Vec<Beneficiary>,
}

/// Distribution plans keyed by name. BTreeMap keeps plan order deterministic.
pub type Distributions = BTreeMap<String, DistributionPlan>;

/// Staking parameters document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingConfig {
    pub staking_param: StakingParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingParams {
    /// Optional initial funding amount in base units (decimal string).
    #[serde(
        default,
        deserialize_with = "deserialize_decimal_u256_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub fund: Option<U256>,
    pub pool: Vec<StakingPool>,
}

/// One staking pool to register after deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingPool {
    /// Lock duration in seconds.
    pub lock_time: u64,
    /// Annual yield rate, in percent.
    pub apy: u64,
    /// Early-withdrawal fee, in percent.
    pub withdraw_fee: u64,
}

/// Deserialize an optional U256 from a decimal string.
fn deserialize_decimal_u256_opt<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<U256>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| U256::from_str_radix(&s, 10).map_err(serde::de::Error::custom))
        .transpose()
}

/// Load and validate the distributions document.
pub fn load_distributions(configs: &Path) -> Result<Distributions, anyhow::Error> {
    let path = configs.join(DISTRIBUTIONS_FILENAME);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let distributions: Distributions =
        serde_json::from_str(&content).context("Failed to parse distributions document")?;

    for (name, plan) in &distributions {
        if plan.day1_percent > 100 {
            anyhow::bail!(
                "Distribution plan '{}' has day1Percent {} (must be 0..=100)",
                name,
                plan.day1_percent
            );
        }
    }

    Ok(distributions)
}

/// Load the crowdsale whitelist (flat ordered array of addresses).
pub fn load_whitelist(configs: &Path) -> Result<Vec<Address>, anyhow::Error> {
    let path = configs.join(WHITELIST_FILENAME);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse whitelist document")
}

/// Load the staking parameters document.
pub fn load_staking(configs: &Path) -> Result<StakingConfig, anyhow::Error> {
    let path = configs.join(STAKING_FILENAME);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse staking document")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_plan_parsing() {
        let raw = r#"{
            "team": {
                "t0": 1647894780,
                "t1": 1647895140,
                "day1Percent": 10,
                "duration": 31536000,
                "beneficiaries": [
                    {"name": "alice", "address": "0x70997970c51812dc3a010c7d01b50e0d17dc79c8", "amount": 1000000}
                ]
            }
        }"#;

        let distributions: Distributions = serde_json::from_str(raw).unwrap();
        let plan = &distributions["team"];
        assert_eq!(plan.day1_percent, 10);
        assert_eq!(plan.beneficiaries.len(), 1);
        assert_eq!(plan.beneficiaries[0].amount, 1_000_000);
    }

    #[test]
    fn test_day1_percent_over_100_is_rejected() {
        let dir = tempdir::TempDir::new("launchkit-config").unwrap();
        let raw = r#"{
            "team": {
                "t0": 0, "t1": 0, "day1Percent": 101, "duration": 1,
                "beneficiaries": []
            }
        }"#;
        std::fs::write(dir.path().join(DISTRIBUTIONS_FILENAME), raw).unwrap();

        let err = load_distributions(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("day1Percent"));
    }

    #[test]
    fn test_staking_config_parsing() {
        let raw = r#"{
            "staking_param": {
                "fund": "5000000000000000000000000",
                "pool": [
                    {"lockTime": 2592000, "apy": 12, "withdrawFee": 5},
                    {"lockTime": 7776000, "apy": 20, "withdrawFee": 3}
                ]
            }
        }"#;

        let config: StakingConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(
            config.staking_param.fund,
            Some(U256::from_str_radix("5000000000000000000000000", 10).unwrap())
        );
        assert_eq!(config.staking_param.pool.len(), 2);
        assert_eq!(config.staking_param.pool[0].lock_time, 2_592_000);
    }

    #[test]
    fn test_staking_fund_is_optional() {
        let raw = r#"{"staking_param": {"pool": []}}"#;
        let config: StakingConfig = serde_json::from_str(raw).unwrap();
        assert!(config.staking_param.fund.is_none());
    }

    #[test]
    fn test_whitelist_order_is_preserved() {
        let dir = tempdir::TempDir::new("launchkit-config").unwrap();
        let raw = r#"[
            "0x0000000000000000000000000000000000000003",
            "0x0000000000000000000000000000000000000001",
            "0x0000000000000000000000000000000000000002"
        ]"#;
        std::fs::write(dir.path().join(WHITELIST_FILENAME), raw).unwrap();

        let whitelist = load_whitelist(dir.path()).unwrap();
        let suffixes: Vec<u8> = whitelist.iter().map(|a| a.as_slice()[19]).collect();
        assert_eq!(suffixes, vec![3, 1, 2]);
    }
}
