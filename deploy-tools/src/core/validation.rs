// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Checks on user-supplied addresses.

use std::str::FromStr;

use alloy::primitives::Address;

use crate::core::chain::{Chain, ChainError};

/// True iff the chain reports bytecode at `address`.
pub async fn is_contract(chain: &impl Chain, address: Address) -> Result<bool, ChainError> {
    Ok(!chain.code_at(address).await?.is_empty())
}

/// Accepts `address` as the underlying token of `label` only if it parses and has code.
pub async fn is_underlying_token(
    chain: &impl Chain,
    label: &str,
    address: &str,
) -> Result<Address, ValidationError> {
    let not_a_contract = || ValidationError::NotAContract {
        label: label.to_owned(),
        address: address.to_owned(),
    };
    let parsed = parse_address(address).ok_or_else(not_a_contract)?;
    if !is_contract(chain, parsed).await? {
        return Err(not_a_contract());
    }
    Ok(parsed)
}

/// Parses a hex address. Mixed-case input must carry a valid checksum.
pub fn parse_address(text: &str) -> Option<Address> {
    let address = Address::from_str(text).ok()?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let mixed_case = digits.chars().any(|c| c.is_ascii_lowercase())
        && digits.chars().any(|c| c.is_ascii_uppercase());
    if mixed_case && address.to_checksum(None).strip_prefix("0x") != Some(digits) {
        return None;
    }
    Some(address)
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("User-defined underlying token for {label}: {address} is not a contract")]
    NotAContract { label: String, address: String },
    #[error("{0}")]
    Chain(#[from] ChainError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChain;

    const TOKEN: Address = Address::repeat_byte(0x42);

    fn chain() -> MockChain {
        let chain = MockChain::new();
        chain.set_code(TOKEN, [0x60, 0x80, 0x60, 0x40]);
        chain
    }

    #[tokio::test]
    async fn detects_code() {
        let chain = chain();
        assert!(is_contract(&chain, TOKEN).await.unwrap());
        assert!(!is_contract(&chain, Address::repeat_byte(0x43)).await.unwrap());
    }

    #[tokio::test]
    async fn accepts_deployed_tokens() {
        let chain = chain();
        let lower = TOKEN.to_string().to_lowercase();
        assert_eq!(
            is_underlying_token(&chain, "cUSDC", &lower).await.unwrap(),
            TOKEN
        );
        let checksummed = TOKEN.to_checksum(None);
        assert_eq!(
            is_underlying_token(&chain, "cUSDC", &checksummed).await.unwrap(),
            TOKEN
        );
    }

    #[tokio::test]
    async fn rejects_accounts_without_code() {
        let chain = chain();
        let eoa = Address::repeat_byte(0x43).to_string();
        let err = is_underlying_token(&chain, "cUSDT", &eoa).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("User-defined underlying token for cUSDT: {eoa} is not a contract")
        );
    }

    #[tokio::test]
    async fn rejects_malformed_addresses() {
        let chain = chain();
        let malformed = [
            "",
            "0x1234",
            "not an address",
            "0xZZ42424242424242424242424242424242424242",
        ];
        for address in malformed {
            let err = is_underlying_token(&chain, "cDAI", address).await.unwrap_err();
            assert!(
                matches!(&err, ValidationError::NotAContract { label, .. } if label == "cDAI"),
                "{address:?} should be rejected"
            );
        }
    }

    #[test]
    fn mixed_case_requires_checksum() {
        let checksummed = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert!(parse_address(checksummed).is_some());
        assert!(parse_address(&checksummed.to_lowercase()).is_some());
        assert!(parse_address("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_none());
    }
}
