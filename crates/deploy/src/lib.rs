//! launchkit-deploy - Deployment library for token launches.
//!
//! This crate provides the orchestration for deploying a token launch: the
//! token itself, the vesting factory with its per-beneficiary distribution,
//! the whitelisted crowdsale, and an optional staking contract. Runs are
//! idempotent: deployed addresses are recorded on disk and reused.

pub mod abi;
mod artifact;
mod builder;
pub mod config;
pub mod contracts;
mod deployer;
pub mod distribution;
pub mod events;
mod fingerprint;
mod record;
mod report;
mod rpc;

pub use artifact::{ARTIFACTS_DIR, ContractArtifact};
pub use builder::{DeployerBuilder, OutDataPath};
pub use config::{
    Beneficiary, DistributionPlan, Distributions, StakingConfig, StakingParams, StakingPool,
};
pub use deployer::{Deployer, LAUNCHCONF_FILENAME, SaleSchedule};
pub use fingerprint::{FINGERPRINT_FILENAME, RunFingerprint, RunVersion};
pub use record::{DeployedContracts, RECORD_FILENAME};
pub use report::{Artifact, ArtifactReport, ArtifactStatus, RunReport};
pub use rpc::{EthClient, LogEntry, TxReceipt};
