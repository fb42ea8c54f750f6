//! Crowdsale handle: timed token sale gated by an address whitelist.

use alloy_core::primitives::Address;
use anyhow::Context;

use crate::{
    abi,
    artifact::ContractArtifact,
    deployer::SaleSchedule,
    rpc::{EthClient, TxReceipt},
};

/// Artifact name of the crowdsale contract.
pub const ARTIFACT_NAME: &str = "Crowdsale";

/// Fixed gas allowance for the crowdsale deployment transaction.
pub const DEPLOY_GAS: u64 = 5_000_000;
/// Gas allowance for a whitelist registration call.
pub const CALL_GAS: u64 = 200_000;

/// Handle bound to a deployed crowdsale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crowdsale {
    pub address: Address,
}

impl Crowdsale {
    /// Deploy the crowdsale with `(token, saleStart, saleEnd, publishDate)`.
    pub async fn deploy(
        client: &EthClient,
        from: Address,
        artifact: &ContractArtifact,
        token: Address,
        sale: SaleSchedule,
    ) -> Result<Self, anyhow::Error> {
        let constructor_args = [
            abi::encode_address(token),
            abi::encode_u64(sale.start),
            abi::encode_u64(sale.end),
            abi::encode_u64(sale.publish),
        ];
        let (address, _receipt) = client
            .deploy(from, artifact.creation_data(&constructor_args), DEPLOY_GAS)
            .await
            .context("Failed to deploy Crowdsale")?;

        tracing::info!(
            %address,
            sale_start = sale.start,
            sale_end = sale.end,
            publish_date = sale.publish,
            "Crowdsale deployed"
        );
        Ok(Self { address })
    }

    /// Register one participant address on the whitelist.
    pub async fn add_whitelisted(
        &self,
        client: &EthClient,
        from: Address,
        participant: Address,
    ) -> Result<TxReceipt, anyhow::Error> {
        let calldata = abi::encode_call(
            "addWhitelisted(address)",
            &[abi::encode_address(participant)],
        );
        client
            .call(from, self.address, calldata, CALL_GAS)
            .await
            .with_context(|| format!("Whitelisting {} failed", participant))
    }
}
