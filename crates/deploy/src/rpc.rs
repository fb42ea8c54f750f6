//! JSON-RPC client for the deployment node.
//!
//! The orchestrator only needs the capability set of an unlocked node:
//! deploy a contract, send a state-changing call and read its receipt, and
//! issue read-only queries. Accounts are node-managed; no local signing.

use std::time::Duration;

use alloy_core::primitives::{Address, B256, Bytes};
use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use url::Url;

/// Default timeout for a single RPC request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Interval between receipt polling attempts.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum time to wait for a transaction receipt.
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// A single log record emitted by a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogEntry {
    /// Address of the contract that emitted the log.
    pub address: Address,
    /// Indexed topics; `topics[0]` is the event signature hash.
    pub topics: Vec<B256>,
    /// Non-indexed event arguments, ABI-encoded.
    pub data: Bytes,
}

/// Receipt of a mined transaction, with its ordered log list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: B256,
    /// Set for contract-creation transactions.
    pub contract_address: Option<Address>,
    #[serde(deserialize_with = "deserialize_u64_from_hex")]
    pub status: u64,
    pub logs: Vec<LogEntry>,
}

/// Deserialize a u64 from a hex string (with 0x prefix).
fn deserialize_u64_from_hex<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    // Owned String: receipts arrive through `serde_json::from_value`, which
    // cannot hand out borrowed strings.
    let s: String = Deserialize::deserialize(deserializer)?;
    u64::from_str_radix(s.trim_start_matches("0x"), 16).map_err(serde::de::Error::custom)
}

/// HTTP JSON-RPC client bound to a single node endpoint.
#[derive(Debug, Clone)]
pub struct EthClient {
    http: reqwest::Client,
    url: Url,
}

impl EthClient {
    pub fn new(url: Url) -> Result<Self, anyhow::Error> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { http, url })
    }

    /// Make a JSON-RPC call and deserialize the result.
    pub async fn rpc_call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, anyhow::Error> {
        let response = self
            .http
            .post(self.url.clone())
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "method": method,
                "params": params,
                "id": 1
            }))
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", method))?;

        let result: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", method))?;

        if let Some(error) = result.get("error") {
            anyhow::bail!(
                "RPC error: {}",
                error
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("unknown")
            );
        }

        let result_value = result
            .get("result")
            .context("No result in response")?
            .clone();

        serde_json::from_value(result_value)
            .with_context(|| format!("Failed to deserialize {} result", method))
    }

    /// List the unlocked accounts managed by the node.
    pub async fn accounts(&self) -> Result<Vec<Address>, anyhow::Error> {
        self.rpc_call("eth_accounts", vec![]).await
    }

    /// The account all deployments and setup calls are issued from (index 0).
    pub async fn deployer_account(&self) -> Result<Address, anyhow::Error> {
        self.accounts()
            .await?
            .first()
            .copied()
            .context("Node exposes no unlocked accounts")
    }

    /// Submit a raw transaction object and return its hash.
    pub async fn send_transaction(&self, tx: Value) -> Result<B256, anyhow::Error> {
        self.rpc_call("eth_sendTransaction", vec![tx]).await
    }

    /// Poll for the receipt of a submitted transaction.
    ///
    /// Fails if the receipt does not appear within the timeout, or if the
    /// transaction reverted.
    pub async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt, anyhow::Error> {
        let start = std::time::Instant::now();

        loop {
            let receipt: Option<TxReceipt> = self
                .rpc_call(
                    "eth_getTransactionReceipt",
                    vec![serde_json::json!(tx_hash)],
                )
                .await?;

            if let Some(receipt) = receipt {
                if receipt.status != 1 {
                    anyhow::bail!("Transaction {} reverted", tx_hash);
                }
                return Ok(receipt);
            }

            if start.elapsed() > RECEIPT_TIMEOUT {
                anyhow::bail!("Timeout waiting for receipt of transaction {}", tx_hash);
            }

            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }

    /// Deploy a contract and return its address along with the receipt.
    pub async fn deploy(
        &self,
        from: Address,
        creation_data: Bytes,
        gas: u64,
    ) -> Result<(Address, TxReceipt), anyhow::Error> {
        let tx_hash = self
            .send_transaction(serde_json::json!({
                "from": from,
                "data": creation_data,
                "gas": format!("0x{:x}", gas),
            }))
            .await
            .context("Failed to send contract creation transaction")?;

        let receipt = self.wait_for_receipt(tx_hash).await?;
        let address = receipt
            .contract_address
            .context("Creation receipt carries no contract address")?;

        tracing::debug!(%address, tx_hash = %tx_hash, "Contract created");
        Ok((address, receipt))
    }

    /// Issue a state-changing contract call and wait for its receipt.
    pub async fn call(
        &self,
        from: Address,
        to: Address,
        calldata: Bytes,
        gas: u64,
    ) -> Result<TxReceipt, anyhow::Error> {
        let tx_hash = self
            .send_transaction(serde_json::json!({
                "from": from,
                "to": to,
                "data": calldata,
                "gas": format!("0x{:x}", gas),
            }))
            .await
            .with_context(|| format!("Failed to send call to {}", to))?;

        self.wait_for_receipt(tx_hash).await
    }

    /// Read-only query via `eth_call`.
    pub async fn query(&self, to: Address, calldata: Bytes) -> Result<Bytes, anyhow::Error> {
        self.rpc_call(
            "eth_call",
            vec![
                serde_json::json!({ "to": to, "data": calldata }),
                serde_json::json!("latest"),
            ],
        )
        .await
        .with_context(|| format!("eth_call to {} failed", to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_deserialization() {
        let raw = serde_json::json!({
            "transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "contractAddress": "0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
            "status": "0x1",
            "logs": [{
                "address": "0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
                "topics": ["0x2222222222222222222222222222222222222222222222222222222222222222"],
                "data": "0x00"
            }]
        });

        let receipt: TxReceipt = serde_json::from_value(raw).unwrap();
        assert_eq!(receipt.status, 1);
        assert!(receipt.contract_address.is_some());
        assert_eq!(receipt.logs.len(), 1);
    }

    #[test]
    fn test_receipt_without_contract_address() {
        let raw = serde_json::json!({
            "transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "contractAddress": null,
            "status": "0x0",
            "logs": []
        });

        let receipt: TxReceipt = serde_json::from_value(raw).unwrap();
        assert_eq!(receipt.status, 0);
        assert!(receipt.contract_address.is_none());
    }
}
