//! Builder module for creating a [`Deployer`] configuration.
//!
//! This module provides the [`DeployerBuilder`] struct which simplifies the
//! creation of a [`Deployer`] by handling output directory creation, configs
//! directory validation, and sale schedule defaulting.

use std::path::PathBuf;

use anyhow::{Context, Result};
use url::Url;

use crate::{Deployer, SaleSchedule};

/// Default sale opening delay when no schedule is provided.
const DEFAULT_SALE_DELAY_SECS: u64 = 24 * 60 * 60;
/// Default sale window length.
const DEFAULT_SALE_WINDOW_SECS: u64 = 14 * 24 * 60 * 60;
/// Default gap between sale close and token publication.
const DEFAULT_PUBLISH_DELAY_SECS: u64 = 24 * 60 * 60;

/// Specifies how the output data directory should be created.
#[derive(Debug, Clone)]
pub enum OutDataPath {
    /// Use a freshly created directory under the system temp dir. The
    /// directory outlives the process; it holds the address record a later
    /// run may resume from.
    TempDir,
    /// Use a specific path.
    Path(PathBuf),
}

/// Builder for creating a [`Deployer`] configuration.
///
/// This builder handles:
/// - Configs directory validation
/// - Output data directory creation
/// - Sale schedule defaulting (opens in one day, runs for two weeks)
///
/// # Example
///
/// ```no_run
/// use launchkit_deploy::DeployerBuilder;
///
/// # fn example() -> anyhow::Result<()> {
/// let deployer = DeployerBuilder::new("http://localhost:8545".parse()?)
///     .configs("configs")
///     .outdata_path("launch-data")
///     .staking_enabled(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeployerBuilder {
    /// RPC endpoint of the target node (required).
    rpc_url: Url,
    /// Directory holding artifacts and launch documents.
    configs: Option<PathBuf>,
    /// The output data path selection.
    outdata: Option<OutDataPath>,
    /// Sale opening timestamp.
    sale_start: Option<u64>,
    /// Sale closing timestamp.
    sale_end: Option<u64>,
    /// Token publication timestamp.
    publish_date: Option<u64>,
    /// Whether to include the staking artifact.
    staking_enabled: bool,
}

impl DeployerBuilder {
    /// Create a new [`DeployerBuilder`] with the required RPC endpoint.
    pub fn new(rpc_url: Url) -> Self {
        Self {
            rpc_url,
            configs: None,
            outdata: None,
            sale_start: None,
            sale_end: None,
            publish_date: None,
            staking_enabled: false,
        }
    }

    /// Set the configs directory.
    ///
    /// If not set, defaults to `./configs`.
    pub fn configs(mut self, path: impl Into<PathBuf>) -> Self {
        self.configs = Some(path.into());
        self
    }

    /// Set the output data directory path.
    ///
    /// If not set, defaults to `./launch-data`.
    pub fn outdata(mut self, outdata: OutDataPath) -> Self {
        self.outdata = Some(outdata);
        self
    }

    /// Set the output data directory to a specific path.
    pub fn outdata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.outdata = Some(OutDataPath::Path(path.into()));
        self
    }

    /// Set the sale opening timestamp.
    pub fn sale_start(mut self, timestamp: u64) -> Self {
        self.sale_start = Some(timestamp);
        self
    }

    /// Set the sale closing timestamp.
    pub fn sale_end(mut self, timestamp: u64) -> Self {
        self.sale_end = Some(timestamp);
        self
    }

    /// Set the token publication timestamp.
    pub fn publish_date(mut self, timestamp: u64) -> Self {
        self.publish_date = Some(timestamp);
        self
    }

    /// Set the full sale schedule at once.
    pub fn sale(mut self, sale: SaleSchedule) -> Self {
        self.sale_start = Some(sale.start);
        self.sale_end = Some(sale.end);
        self.publish_date = Some(sale.publish);
        self
    }

    /// Enable or disable the staking artifact.
    pub fn staking_enabled(mut self, enabled: bool) -> Self {
        self.staking_enabled = enabled;
        self
    }

    /// Build the [`Deployer`] configuration.
    ///
    /// This method:
    /// 1. Validates that the configs directory exists
    /// 2. Creates the output data directory if it doesn't exist
    /// 3. Fills in the sale schedule defaults and checks its ordering
    pub fn build(self) -> Result<Deployer> {
        let configs = self.configs.unwrap_or_else(|| PathBuf::from("configs"));
        if !configs.is_dir() {
            anyhow::bail!(
                "Configs directory not found: {}. It must contain the contract \
                 artifacts and launch documents.",
                configs.display()
            );
        }
        let configs = configs
            .canonicalize()
            .context("Failed to canonicalize configs directory path")?;

        let outdata_path = match self.outdata {
            None => PathBuf::from("launch-data"),
            Some(OutDataPath::TempDir) => {
                // into_path keeps the directory on disk instead of deleting
                // it when the guard drops.
                tempdir::TempDir::new("launch-data-")
                    .context("Failed to create temporary directory")?
                    .into_path()
            }
            Some(OutDataPath::Path(path)) => path,
        };

        if !outdata_path.try_exists().context(format!(
            "Failed to check if output data directory exists at path {}. Ensure you provided valid permissions to the directory.",
            outdata_path.display()
        ))? {
            std::fs::create_dir_all(&outdata_path)
                .context("Failed to create output data directory")?;
        }

        let outdata_path = outdata_path
            .canonicalize()
            .context("Failed to canonicalize output data directory path")?;

        let now = chrono::Utc::now().timestamp() as u64;
        let start = self.sale_start.unwrap_or(now + DEFAULT_SALE_DELAY_SECS);
        let end = self.sale_end.unwrap_or(start + DEFAULT_SALE_WINDOW_SECS);
        let publish = self.publish_date.unwrap_or(end + DEFAULT_PUBLISH_DELAY_SECS);

        if start >= end {
            anyhow::bail!("Sale start ({}) must be before sale end ({})", start, end);
        }
        if publish < end {
            anyhow::bail!(
                "Publish date ({}) must not be before sale end ({})",
                publish,
                end
            );
        }

        tracing::info!(
            rpc_url = %self.rpc_url,
            configs = %configs.display(),
            outdata_path = %outdata_path.display(),
            sale_start = start,
            sale_end = end,
            publish_date = publish,
            staking_enabled = self.staking_enabled,
            "Building launch deployer configuration..."
        );

        Ok(Deployer {
            rpc_url: self.rpc_url,
            configs,
            outdata: outdata_path,
            sale: SaleSchedule { start, end, publish },
            staking_enabled: self.staking_enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn rpc() -> Url {
        "http://localhost:8545".parse().unwrap()
    }

    #[test]
    fn builder_defaults() {
        let builder = DeployerBuilder::new(rpc());
        assert!(builder.configs.is_none());
        assert!(builder.outdata.is_none());
        assert!(builder.sale_start.is_none());
        assert!(!builder.staking_enabled);
    }

    #[test]
    fn build_fails_without_configs_dir() {
        let result = DeployerBuilder::new(rpc())
            .configs("/nonexistent/launchkit-configs")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn build_fills_sale_defaults() {
        let configs = TempDir::new("launchkit-configs").unwrap();
        let outdata = TempDir::new("launchkit-outdata").unwrap();

        let deployer = DeployerBuilder::new(rpc())
            .configs(configs.path())
            .outdata_path(outdata.path())
            .build()
            .unwrap();

        assert!(deployer.sale.start < deployer.sale.end);
        assert!(deployer.sale.end <= deployer.sale.publish);
        assert_eq!(
            deployer.sale.end - deployer.sale.start,
            DEFAULT_SALE_WINDOW_SECS
        );
    }

    #[test]
    fn temp_dir_outdata_survives_build() {
        let configs = TempDir::new("launchkit-configs").unwrap();

        let deployer = DeployerBuilder::new(rpc())
            .configs(configs.path())
            .outdata(OutDataPath::TempDir)
            .build()
            .unwrap();

        assert!(deployer.outdata.is_dir());
        let _ = std::fs::remove_dir_all(&deployer.outdata);
    }

    #[test]
    fn build_rejects_inverted_schedule() {
        let configs = TempDir::new("launchkit-configs").unwrap();
        let outdata = TempDir::new("launchkit-outdata").unwrap();

        let result = DeployerBuilder::new(rpc())
            .configs(configs.path())
            .outdata_path(outdata.path())
            .sale_start(2000)
            .sale_end(1000)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn build_rejects_publish_before_sale_end() {
        let configs = TempDir::new("launchkit-configs").unwrap();
        let outdata = TempDir::new("launchkit-outdata").unwrap();

        let result = DeployerBuilder::new(rpc())
            .configs(configs.path())
            .outdata_path(outdata.path())
            .sale_start(1000)
            .sale_end(2000)
            .publish_date(1500)
            .build();
        assert!(result.is_err());
    }
}
