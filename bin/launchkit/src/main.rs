//! launchkit is a CLI tool that deploys a token launch in a single idempotent run.

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use comfy_table::{Table, presets::UTF8_FULL};

use cli::{Cli, OutData};
use launchkit_deploy::{ArtifactStatus, Deployer, DeployerBuilder, OutDataPath, RunReport};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    // If a config file is provided, load it and run
    if let Some(config_path) = &cli.config {
        let config_path = PathBuf::from(config_path);
        let deployer = Deployer::load_from_file(&config_path)?;

        tracing::info!(
            config_path = %config_path.display(),
            outdata_path = %deployer.outdata.display(),
            rpc_url = %deployer.rpc_url,
            "Loading launch from config file..."
        );

        let report = deployer.deploy().await?;
        return finish(report);
    }

    // Otherwise, create a new launch from CLI arguments
    let mut builder = DeployerBuilder::new(cli.network.to_rpc_url()?)
        .configs(cli.configs)
        .staking_enabled(cli.staking);

    // Set output data path if provided
    if let Some(outdata) = cli.outdata {
        let outdata_path = match outdata {
            OutData::TempDir => OutDataPath::TempDir,
            OutData::Path(path) => OutDataPath::Path(PathBuf::from(path)),
        };
        builder = builder.outdata(outdata_path);
    }

    // Set sale schedule overrides if provided
    if let Some(start) = cli.sale_start {
        builder = builder.sale_start(start);
    }
    if let Some(end) = cli.sale_end {
        builder = builder.sale_end(end);
    }
    if let Some(publish) = cli.publish_date {
        builder = builder.publish_date(publish);
    }

    // Build the deployer configuration
    let deployer = builder.build()?;

    // Save the configuration to Launchkit.toml before running
    deployer.save_config()?;

    let report = deployer.deploy().await?;
    finish(report)
}

/// Print the run report and turn a failed run into a non-zero exit code.
fn finish(report: RunReport) -> Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Artifact", "Status", "Address", "Detail"]);

    for entry in &report.artifacts {
        table.add_row(vec![
            entry.artifact.to_string(),
            entry.status.to_string(),
            entry
                .address
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
            entry.detail.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");

    if !report.is_success() {
        let failed = report
            .artifacts
            .iter()
            .filter(|a| a.status == ArtifactStatus::Failed)
            .map(|a| a.artifact.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow::bail!("Launch run failed at: {}", failed);
    }

    Ok(())
}
