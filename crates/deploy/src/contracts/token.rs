//! Launch token handle (ERC20-style surface).

use alloy_core::primitives::{Address, U256};
use anyhow::Context;

use crate::{
    abi,
    artifact::ContractArtifact,
    rpc::{EthClient, TxReceipt},
};

/// Artifact name of the token contract.
pub const ARTIFACT_NAME: &str = "Token";

/// Gas allowance for the token deployment transaction.
pub const DEPLOY_GAS: u64 = 4_000_000;
/// Gas allowance for token setup calls (transfer/approve).
pub const CALL_GAS: u64 = 200_000;

/// Handle bound to a deployed token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub address: Address,
}

impl Token {
    /// Bind to an already-deployed token.
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    /// Deploy the token. The constructor takes no arguments and mints the
    /// entire fixed supply to the deployer account.
    pub async fn deploy(
        client: &EthClient,
        from: Address,
        artifact: &ContractArtifact,
    ) -> Result<Self, anyhow::Error> {
        let (address, _receipt) = client
            .deploy(from, artifact.creation_data(&[]), DEPLOY_GAS)
            .await
            .context("Failed to deploy Token")?;

        tracing::info!(%address, "Token deployed");
        Ok(Self { address })
    }

    pub async fn transfer(
        &self,
        client: &EthClient,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TxReceipt, anyhow::Error> {
        let calldata = abi::encode_call(
            "transfer(address,uint256)",
            &[abi::encode_address(to), abi::encode_u256(amount)],
        );
        client
            .call(from, self.address, calldata, CALL_GAS)
            .await
            .with_context(|| format!("Token transfer to {} failed", to))
    }

    pub async fn approve(
        &self,
        client: &EthClient,
        from: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxReceipt, anyhow::Error> {
        let calldata = abi::encode_call(
            "approve(address,uint256)",
            &[abi::encode_address(spender), abi::encode_u256(amount)],
        );
        client
            .call(from, self.address, calldata, CALL_GAS)
            .await
            .with_context(|| format!("Token approval for {} failed", spender))
    }

    pub async fn balance_of(
        &self,
        client: &EthClient,
        owner: Address,
    ) -> Result<U256, anyhow::Error> {
        let calldata = abi::encode_call("balanceOf(address)", &[abi::encode_address(owner)]);
        let result = client.query(self.address, calldata).await?;
        abi::decode_u256(&result).context("Failed to decode balanceOf result")
    }

    pub async fn total_supply(&self, client: &EthClient) -> Result<U256, anyhow::Error> {
        let result = client
            .query(self.address, abi::encode_call("totalSupply()", &[]))
            .await?;
        abi::decode_u256(&result).context("Failed to decode totalSupply result")
    }
}
