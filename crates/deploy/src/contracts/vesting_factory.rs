//! Vesting factory handle.
//!
//! The factory instantiates one dedicated vesting contract per beneficiary
//! and announces the child address through a `ContractInstantiation` event.

use alloy_core::primitives::{Address, U256};
use anyhow::Context;

use crate::{
    abi,
    artifact::ContractArtifact,
    rpc::{EthClient, TxReceipt},
};

/// Artifact name of the vesting factory contract.
pub const ARTIFACT_NAME: &str = "VestingFactory";

/// Gas allowance for the factory deployment transaction.
pub const DEPLOY_GAS: u64 = 4_000_000;
/// Gas allowance for a child-contract creation call.
pub const CREATE_GAS: u64 = 3_000_000;

/// Handle bound to a deployed vesting factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingFactory {
    pub address: Address,
}

impl VestingFactory {
    /// Deploy the factory (no constructor arguments).
    pub async fn deploy(
        client: &EthClient,
        from: Address,
        artifact: &ContractArtifact,
    ) -> Result<Self, anyhow::Error> {
        let (address, _receipt) = client
            .deploy(from, artifact.creation_data(&[]), DEPLOY_GAS)
            .await
            .context("Failed to deploy VestingFactory")?;

        tracing::info!(%address, "VestingFactory deployed");
        Ok(Self { address })
    }

    /// Create a vesting contract for one beneficiary.
    ///
    /// Returns the raw receipt so the caller can extract the child address
    /// from the instantiation event.
    pub async fn create(
        &self,
        client: &EthClient,
        from: Address,
        beneficiary: Address,
        t0: u64,
        t1: u64,
        initial_amount: U256,
        duration: u64,
    ) -> Result<TxReceipt, anyhow::Error> {
        let calldata = abi::encode_call(
            "create(address,uint256,uint256,uint256,uint256)",
            &[
                abi::encode_address(beneficiary),
                abi::encode_u64(t0),
                abi::encode_u64(t1),
                abi::encode_u256(initial_amount),
                abi::encode_u64(duration),
            ],
        );
        client
            .call(from, self.address, calldata, CREATE_GAS)
            .await
            .with_context(|| format!("Vesting creation for {} failed", beneficiary))
    }
}
