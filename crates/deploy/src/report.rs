//! Per-run outcome report.
//!
//! Every run produces one entry per artifact stating whether it was freshly
//! deployed, reused from the address record, skipped after an earlier
//! failure, or failed itself.

use alloy_core::primitives::Address;
use serde::{Deserialize, Serialize};

/// The on-chain artifacts managed by a launch run, in deployment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum Artifact {
    Token,
    VestingFactory,
    Crowdsale,
    Staking,
}

/// Outcome of one artifact in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum ArtifactStatus {
    /// Freshly deployed and configured during this run.
    Deployed,
    /// Address found in the record, nothing done.
    Reused,
    /// Not attempted because an earlier artifact failed, or disabled by
    /// configuration.
    Skipped,
    /// Attempted and failed. The run stops here.
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactReport {
    pub artifact: Artifact,
    pub status: ArtifactStatus,
    pub address: Option<Address>,
    /// Failure or skip reason, empty otherwise.
    pub detail: Option<String>,
}

impl ArtifactReport {
    pub fn deployed(artifact: Artifact, address: Address) -> Self {
        Self { artifact, status: ArtifactStatus::Deployed, address: Some(address), detail: None }
    }

    pub fn reused(artifact: Artifact, address: Address) -> Self {
        Self { artifact, status: ArtifactStatus::Reused, address: Some(address), detail: None }
    }

    pub fn skipped(artifact: Artifact, reason: impl Into<String>) -> Self {
        Self {
            artifact,
            status: ArtifactStatus::Skipped,
            address: None,
            detail: Some(reason.into()),
        }
    }

    pub fn failed(artifact: Artifact, error: &anyhow::Error) -> Self {
        Self {
            artifact,
            status: ArtifactStatus::Failed,
            address: None,
            detail: Some(format!("{:#}", error)),
        }
    }
}

/// Aggregated outcome of a full run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub artifacts: Vec<ArtifactReport>,
}

impl RunReport {
    pub fn push(&mut self, entry: ArtifactReport) {
        self.artifacts.push(entry);
    }

    /// True when no artifact failed. Skipped-by-configuration runs still
    /// count as successful.
    pub fn is_success(&self) -> bool {
        self.artifacts
            .iter()
            .all(|a| a.status != ArtifactStatus::Failed)
    }

    pub fn status_of(&self, artifact: Artifact) -> Option<ArtifactStatus> {
        self.artifacts
            .iter()
            .find(|a| a.artifact == artifact)
            .map(|a| a.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_succeeds_without_failures() {
        let mut report = RunReport::default();
        report.push(ArtifactReport::deployed(Artifact::Token, Address::ZERO));
        report.push(ArtifactReport::skipped(Artifact::Staking, "staking disabled"));
        assert!(report.is_success());
        assert_eq!(report.status_of(Artifact::Token), Some(ArtifactStatus::Deployed));
    }

    #[test]
    fn report_fails_on_any_failure() {
        let mut report = RunReport::default();
        report.push(ArtifactReport::reused(Artifact::Token, Address::ZERO));
        report.push(ArtifactReport::failed(
            Artifact::VestingFactory,
            &anyhow::anyhow!("boom"),
        ));
        assert!(!report.is_success());
        let entry = &report.artifacts[1];
        assert!(entry.detail.as_deref().unwrap().contains("boom"));
    }

    #[test]
    fn artifact_names_match_record_keys() {
        assert_eq!(Artifact::Token.to_string(), "Token");
        assert_eq!(Artifact::VestingFactory.to_string(), "VestingFactory");
        assert_eq!(Artifact::Crowdsale.to_string(), "Crowdsale");
        assert_eq!(Artifact::Staking.to_string(), "Staking");
    }
}
