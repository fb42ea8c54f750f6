//! Calldata encoding for the fixed contract surface the orchestrator drives.
//!
//! Every operation this tool issues takes only static arguments, so calldata
//! is a 4-byte selector followed by 32-byte words.

use alloy_core::primitives::{Address, Bytes, U256, keccak256};
use anyhow::Context;

/// A single 32-byte ABI word.
pub type Word = [u8; 32];

/// First four bytes of the keccak-256 hash of the canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Left-pad an address into a 32-byte word.
pub fn encode_address(address: Address) -> Word {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}

pub fn encode_u256(value: U256) -> Word {
    value.to_be_bytes::<32>()
}

pub fn encode_u64(value: u64) -> Word {
    encode_u256(U256::from(value))
}

/// Build calldata for a call whose arguments are all static words.
pub fn encode_call(signature: &str, words: &[Word]) -> Bytes {
    let mut data = Vec::with_capacity(4 + 32 * words.len());
    data.extend_from_slice(&selector(signature));
    for word in words {
        data.extend_from_slice(word);
    }
    Bytes::from(data)
}

/// Decode a single 32-byte return word as a U256.
pub fn decode_u256(data: &[u8]) -> Result<U256, anyhow::Error> {
    let word: &[u8; 32] = data
        .get(..32)
        .and_then(|slice| slice.try_into().ok())
        .with_context(|| format!("Expected a 32-byte return word, got {} bytes", data.len()))?;
    Ok(U256::from_be_bytes(*word))
}

/// Decode a 32-byte word as a left-padded address.
pub fn decode_address(word: &[u8]) -> Result<Address, anyhow::Error> {
    if word.len() != 32 {
        anyhow::bail!("Expected a 32-byte address word, got {} bytes", word.len());
    }
    Ok(Address::from_slice(&word[12..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_erc20_selectors() {
        // Published ERC20 selectors.
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("approve(address,uint256)"), [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(selector("totalSupply()"), [0x18, 0x16, 0x0d, 0xdd]);
    }

    #[test]
    fn test_encode_call_layout() {
        let to: Address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
            .parse()
            .unwrap();
        let amount = U256::from(1_000_000_000_000_000_000u128);
        let calldata = encode_call(
            "transfer(address,uint256)",
            &[encode_address(to), encode_u256(amount)],
        );

        // selector + 2 words
        assert_eq!(calldata.len(), 4 + 64);
        assert_eq!(&calldata[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        // Address is left-padded into the first word.
        assert_eq!(&calldata[4..16], &[0u8; 12]);
        assert_eq!(&calldata[16..36], to.as_slice());
        // Amount is big-endian in the second word.
        assert_eq!(
            hex::encode(&calldata[36..68]),
            "0000000000000000000000000000000000000000000000000de0b6b3a7640000"
        );
    }

    #[test]
    fn test_address_word_roundtrip() {
        let address: Address = "0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef"
            .parse()
            .unwrap();
        let word = encode_address(address);
        assert_eq!(decode_address(&word).unwrap(), address);
    }

    #[test]
    fn test_decode_u256_rejects_short_words() {
        assert!(decode_u256(&[0u8; 16]).is_err());
        let value = decode_u256(&encode_u64(42)).unwrap();
        assert_eq!(value, U256::from(42));
    }
}
