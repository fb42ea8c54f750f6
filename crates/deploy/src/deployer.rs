use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use alloy_core::primitives::Address;

use crate::{
    artifact::ContractArtifact,
    config::{self, StakingConfig},
    contracts::{Crowdsale, Staking, Token, VestingFactory, crowdsale, staking, token,
        vesting_factory},
    distribution,
    fingerprint::{FINGERPRINT_FILENAME, RunFingerprint, RunVersion},
    record::{DeployedContracts, RECORD_FILENAME},
    report::{Artifact, ArtifactReport, RunReport},
    rpc::EthClient,
};

/// The default name for the launchkit configuration file.
pub const LAUNCHCONF_FILENAME: &str = "Launchkit.toml";

/// Deployment order of the managed artifacts.
const ARTIFACT_ORDER: [Artifact; 4] = [
    Artifact::Token,
    Artifact::VestingFactory,
    Artifact::Crowdsale,
    Artifact::Staking,
];

/// Unix timestamps framing the crowdsale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSchedule {
    /// When the sale opens.
    pub start: u64,
    /// When the sale closes.
    pub end: u64,
    /// When the token becomes publicly transferable.
    pub publish: u64,
}

/// Main deployer that orchestrates the token launch.
///
/// This struct contains all the configuration needed to run a launch and can
/// be serialized to/from TOML format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployer {
    /// RPC endpoint of the target node.
    pub rpc_url: Url,
    /// Directory holding artifacts and launch documents.
    pub configs: PathBuf,
    /// Path to the output data directory.
    pub outdata: PathBuf,
    /// Sale schedule passed to the crowdsale constructor.
    pub sale: SaleSchedule,
    /// Whether the staking artifact is part of the launch.
    pub staking_enabled: bool,
}

impl Deployer {
    /// Save the configuration to a TOML file.
    pub fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize deployer config to TOML")?;
        std::fs::write(path, content)
            .context(format!("Failed to write config to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Load the configuration from a TOML file.
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file or directory not found: {}",
                path.display()
            ));
        }

        let config_path = if path.is_dir() {
            path.join(LAUNCHCONF_FILENAME)
        } else {
            path.to_path_buf()
        };

        let content = std::fs::read_to_string(config_path)
            .context(format!("Failed to read config from {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).context("Failed to parse config file as TOML")?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Save the deployer's configuration to the default location
    /// (Launchkit.toml in outdata).
    pub fn save_config(&self) -> Result<PathBuf> {
        let config_path = self.outdata.join(LAUNCHCONF_FILENAME);
        self.save_to_file(&config_path)?;
        Ok(config_path)
    }
}

impl Deployer {
    /// Run the launch end to end.
    ///
    /// Each artifact is deployed at most once: addresses already present in
    /// the record are reused without touching the chain. The record is
    /// persisted after every completed artifact, so an interrupted run
    /// resumes where it stopped. A failed artifact stops the run; the
    /// remaining artifacts are reported as skipped and the returned report
    /// carries the failure.
    pub async fn deploy(&self) -> Result<RunReport> {
        tracing::info!(rpc_url = %self.rpc_url, "Starting launch run...");

        let client = EthClient::new(self.rpc_url.clone())?;
        let from = client
            .deployer_account()
            .await
            .context("Failed to resolve deployer account")?;
        tracing::info!(%from, "Using deployer account");

        let record_path = self.outdata.join(RECORD_FILENAME);
        let mut record = DeployedContracts::load(&record_path)?;
        self.check_fingerprint();

        let mut report = RunReport::default();

        let token = match self.ensure_token(&client, from, &mut record, &record_path).await {
            Ok((token, entry)) => {
                report.push(entry);
                token
            }
            Err(err) => {
                Self::abort(&mut report, Artifact::Token, err);
                return Ok(report);
            }
        };

        match self
            .ensure_vesting_factory(&client, from, &token, &mut record, &record_path)
            .await
        {
            Ok(entry) => report.push(entry),
            Err(err) => {
                Self::abort(&mut report, Artifact::VestingFactory, err);
                return Ok(report);
            }
        }

        match self
            .ensure_crowdsale(&client, from, &token, &mut record, &record_path)
            .await
        {
            Ok(entry) => report.push(entry),
            Err(err) => {
                Self::abort(&mut report, Artifact::Crowdsale, err);
                return Ok(report);
            }
        }

        match self
            .ensure_staking(&client, from, &token, &mut record, &record_path)
            .await
        {
            Ok(entry) => report.push(entry),
            Err(err) => {
                Self::abort(&mut report, Artifact::Staking, err);
                return Ok(report);
            }
        }

        self.save_fingerprint();
        tracing::info!("Launch run complete");
        Ok(report)
    }

    /// Warn when the recorded addresses were produced under a different
    /// configuration. The run still proceeds; stale records must be removed
    /// by hand.
    fn check_fingerprint(&self) {
        let version_path = self.outdata.join(FINGERPRINT_FILENAME);
        if let Ok(previous) = RunVersion::load_from_file(&version_path) {
            let current = RunFingerprint::from_deployer(self).compute_hash();
            if previous.config_hash != current {
                tracing::warn!(
                    recorded_hash = %previous.config_hash,
                    current_hash = %current,
                    "Configuration changed since the recorded deployment; \
                     recorded addresses may be stale"
                );
            }
        }
    }

    fn save_fingerprint(&self) {
        let version_path = self.outdata.join(FINGERPRINT_FILENAME);
        let version = RunVersion::new(RunFingerprint::from_deployer(self).compute_hash());
        if let Err(err) = version.save_to_file(&version_path) {
            tracing::warn!(error = %format!("{:#}", err), "Could not save run version metadata");
        }
    }

    /// Mark `failed` as failed and every artifact after it as skipped.
    fn abort(report: &mut RunReport, failed: Artifact, err: anyhow::Error) {
        tracing::error!(artifact = %failed, error = %format!("{:#}", err), "Launch step failed");
        report.push(ArtifactReport::failed(failed, &err));

        let position = ARTIFACT_ORDER
            .iter()
            .position(|a| *a == failed)
            .unwrap_or(ARTIFACT_ORDER.len());
        for artifact in &ARTIFACT_ORDER[position + 1..] {
            report.push(ArtifactReport::skipped(
                *artifact,
                format!("not attempted after {} failure", failed),
            ));
        }
    }

    fn persist(
        record: &DeployedContracts,
        record_path: &std::path::Path,
        artifact: Artifact,
    ) -> Result<()> {
        record
            .save(record_path)
            .with_context(|| format!("Failed to record {} address", artifact))
    }

    async fn ensure_token(
        &self,
        client: &EthClient,
        from: Address,
        record: &mut DeployedContracts,
        record_path: &std::path::Path,
    ) -> Result<(Token, ArtifactReport)> {
        if let Some(address) = record.token {
            tracing::info!(%address, "Token already deployed, reusing");
            return Ok((Token::at(address), ArtifactReport::reused(Artifact::Token, address)));
        }

        let artifact = ContractArtifact::load(&self.configs, token::ARTIFACT_NAME)?;
        let token = Token::deploy(client, from, &artifact).await?;

        record.token = Some(token.address);
        Self::persist(record, record_path, Artifact::Token)?;

        Ok((token, ArtifactReport::deployed(Artifact::Token, token.address)))
    }

    /// Deploy the vesting factory and run the full distribution.
    ///
    /// The factory address is recorded only after every beneficiary has been
    /// set up, so an interrupted distribution is retried from scratch on the
    /// next run.
    async fn ensure_vesting_factory(
        &self,
        client: &EthClient,
        from: Address,
        token: &Token,
        record: &mut DeployedContracts,
        record_path: &std::path::Path,
    ) -> Result<ArtifactReport> {
        if let Some(address) = record.vesting_factory {
            tracing::info!(%address, "VestingFactory already deployed, reusing");
            return Ok(ArtifactReport::reused(Artifact::VestingFactory, address));
        }

        let plans = config::load_distributions(&self.configs)?;
        let artifact = ContractArtifact::load(&self.configs, vesting_factory::ARTIFACT_NAME)?;
        let factory = VestingFactory::deploy(client, from, &artifact).await?;

        distribution::run(client, from, token, &factory, &plans).await?;

        record.vesting_factory = Some(factory.address);
        Self::persist(record, record_path, Artifact::VestingFactory)?;

        Ok(ArtifactReport::deployed(Artifact::VestingFactory, factory.address))
    }

    async fn ensure_crowdsale(
        &self,
        client: &EthClient,
        from: Address,
        token: &Token,
        record: &mut DeployedContracts,
        record_path: &std::path::Path,
    ) -> Result<ArtifactReport> {
        if let Some(address) = record.crowdsale {
            tracing::info!(%address, "Crowdsale already deployed, reusing");
            return Ok(ArtifactReport::reused(Artifact::Crowdsale, address));
        }

        let whitelist = config::load_whitelist(&self.configs)?;
        let artifact = ContractArtifact::load(&self.configs, crowdsale::ARTIFACT_NAME)?;
        let sale = Crowdsale::deploy(client, from, &artifact, token.address, self.sale).await?;

        for participant in &whitelist {
            sale.add_whitelisted(client, from, *participant).await?;
        }
        tracing::info!(participants = whitelist.len(), "Whitelist registered");

        record.crowdsale = Some(sale.address);
        Self::persist(record, record_path, Artifact::Crowdsale)?;

        Ok(ArtifactReport::deployed(Artifact::Crowdsale, sale.address))
    }

    async fn ensure_staking(
        &self,
        client: &EthClient,
        from: Address,
        token: &Token,
        record: &mut DeployedContracts,
        record_path: &std::path::Path,
    ) -> Result<ArtifactReport> {
        if !self.staking_enabled {
            tracing::info!("Staking disabled, skipping");
            return Ok(ArtifactReport::skipped(Artifact::Staking, "staking disabled"));
        }

        if let Some(address) = record.staking {
            tracing::info!(%address, "Staking already deployed, reusing");
            return Ok(ArtifactReport::reused(Artifact::Staking, address));
        }

        let StakingConfig { staking_param } = config::load_staking(&self.configs)?;
        let artifact = ContractArtifact::load(&self.configs, staking::ARTIFACT_NAME)?;
        let staking = Staking::deploy(client, from, &artifact, token.address).await?;

        if let Some(fund) = staking_param.fund {
            token.approve(client, from, staking.address, fund).await?;
            staking.fund(client, from, fund).await?;
        }
        for pool in &staking_param.pool {
            staking.add_pool(client, from, pool).await?;
        }
        tracing::info!(pools = staking_param.pool.len(), "Staking pools registered");

        record.staking = Some(staking.address);
        Self::persist(record, record_path, Artifact::Staking)?;

        Ok(ArtifactReport::deployed(Artifact::Staking, staking.address))
    }
}
