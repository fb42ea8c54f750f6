//! Staking contract handle.

use alloy_core::primitives::{Address, U256};
use anyhow::Context;

use crate::{
    abi,
    artifact::ContractArtifact,
    config::StakingPool,
    rpc::{EthClient, TxReceipt},
};

/// Artifact name of the staking contract.
pub const ARTIFACT_NAME: &str = "Staking";

/// Fixed gas allowance for the staking deployment transaction.
pub const DEPLOY_GAS: u64 = 3_000_000;
/// Gas allowance for staking setup calls (fund/add).
pub const CALL_GAS: u64 = 300_000;

/// Handle bound to a deployed staking contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staking {
    pub address: Address,
}

impl Staking {
    /// Deploy the staking contract with `(token)`.
    pub async fn deploy(
        client: &EthClient,
        from: Address,
        artifact: &ContractArtifact,
        token: Address,
    ) -> Result<Self, anyhow::Error> {
        let (address, _receipt) = client
            .deploy(
                from,
                artifact.creation_data(&[abi::encode_address(token)]),
                DEPLOY_GAS,
            )
            .await
            .context("Failed to deploy Staking")?;

        tracing::info!(%address, "Staking deployed");
        Ok(Self { address })
    }

    /// Pull the pre-approved funding amount from the deployer.
    pub async fn fund(
        &self,
        client: &EthClient,
        from: Address,
        amount: U256,
    ) -> Result<TxReceipt, anyhow::Error> {
        let calldata = abi::encode_call("fund(uint256)", &[abi::encode_u256(amount)]);
        client
            .call(from, self.address, calldata, CALL_GAS)
            .await
            .context("Staking funding failed")
    }

    /// Register one staking pool.
    pub async fn add_pool(
        &self,
        client: &EthClient,
        from: Address,
        pool: &StakingPool,
    ) -> Result<TxReceipt, anyhow::Error> {
        let calldata = abi::encode_call(
            "add(uint256,uint256,uint256)",
            &[
                abi::encode_u64(pool.lock_time),
                abi::encode_u64(pool.apy),
                abi::encode_u64(pool.withdraw_fee),
            ],
        );
        client
            .call(from, self.address, calldata, CALL_GAS)
            .await
            .with_context(|| format!("Registering staking pool (lock {}s) failed", pool.lock_time))
    }
}
