//! Typed extraction of event logs from transaction receipts.
//!
//! The vesting factory announces each child contract through a single
//! `ContractInstantiation` event; anything other than exactly one matching
//! log makes the child address ambiguous and fails the operation.

use alloy_core::primitives::{Address, B256, keccak256};
use anyhow::Context;

use crate::{
    abi,
    rpc::{LogEntry, TxReceipt},
};

/// Signature hash of `ContractInstantiation(address sender, address instantiation)`.
pub fn instantiation_topic() -> B256 {
    keccak256("ContractInstantiation(address,address)".as_bytes())
}

/// Find the single log whose first topic matches `topic0`.
///
/// Zero or more than one matching log is an ambiguity error: the caller
/// cannot tell which (if any) log announces the value it is after.
pub fn find_single_log(logs: &[LogEntry], topic0: B256) -> Result<&LogEntry, anyhow::Error> {
    let matching: Vec<&LogEntry> = logs
        .iter()
        .filter(|log| log.topics.first() == Some(&topic0))
        .collect();

    match matching.as_slice() {
        [log] => Ok(log),
        _ => anyhow::bail!(
            "Ambiguous event: expected exactly one matching log, found {}",
            matching.len()
        ),
    }
}

/// Extract the freshly created contract address from a factory creation receipt.
///
/// The event carries two non-indexed address words: the sender and the new
/// instantiation. The second word is the child address.
pub fn instantiation_address(receipt: &TxReceipt) -> Result<Address, anyhow::Error> {
    let log = find_single_log(&receipt.logs, instantiation_topic()).with_context(|| {
        format!(
            "Could not determine instantiation address from transaction {}",
            receipt.transaction_hash
        )
    })?;

    let word = log
        .data
        .get(32..64)
        .context("Instantiation event data is shorter than two words")?;

    abi::decode_address(word)
}

#[cfg(test)]
mod tests {
    use alloy_core::primitives::{Bytes, U256};

    use super::*;

    fn instantiation_log(sender: Address, child: Address) -> LogEntry {
        let mut data = Vec::with_capacity(64);
        data.extend_from_slice(&abi::encode_address(sender));
        data.extend_from_slice(&abi::encode_address(child));
        LogEntry {
            address: sender,
            topics: vec![instantiation_topic()],
            data: Bytes::from(data),
        }
    }

    fn unrelated_log() -> LogEntry {
        LogEntry {
            address: Address::repeat_byte(0x99),
            topics: vec![keccak256("Transfer(address,address,uint256)".as_bytes())],
            data: Bytes::from(abi::encode_u256(U256::from(1)).to_vec()),
        }
    }

    fn receipt_with_logs(logs: Vec<LogEntry>) -> TxReceipt {
        TxReceipt {
            transaction_hash: B256::repeat_byte(0xab),
            contract_address: None,
            status: 1,
            logs,
        }
    }

    #[test]
    fn test_single_instantiation_is_extracted() {
        let factory = Address::repeat_byte(0x01);
        let child = Address::repeat_byte(0x02);
        let receipt =
            receipt_with_logs(vec![unrelated_log(), instantiation_log(factory, child)]);

        assert_eq!(instantiation_address(&receipt).unwrap(), child);
    }

    #[test]
    fn test_zero_matching_logs_is_ambiguous() {
        let receipt = receipt_with_logs(vec![unrelated_log()]);
        let err = instantiation_address(&receipt).unwrap_err();
        assert!(format!("{:#}", err).contains("found 0"));
    }

    #[test]
    fn test_multiple_matching_logs_is_ambiguous() {
        let factory = Address::repeat_byte(0x01);
        let receipt = receipt_with_logs(vec![
            instantiation_log(factory, Address::repeat_byte(0x02)),
            instantiation_log(factory, Address::repeat_byte(0x03)),
        ]);
        let err = instantiation_address(&receipt).unwrap_err();
        assert!(format!("{:#}", err).contains("found 2"));
    }

    #[test]
    fn test_truncated_event_data_is_rejected() {
        let factory = Address::repeat_byte(0x01);
        let log = LogEntry {
            address: factory,
            topics: vec![instantiation_topic()],
            data: Bytes::from(abi::encode_address(factory).to_vec()),
        };
        assert!(instantiation_address(&receipt_with_logs(vec![log])).is_err());
    }
}
