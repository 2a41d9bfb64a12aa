// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Signer resolution.

use std::{collections::BTreeMap, convert::Infallible, str::FromStr};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::core::chain::{Chain, ChainError};

/// Named role used for deployments when no sender is given.
pub const DEFAULT_DEPLOYER_ROLE: &str = "deployer";

/// A signing identity bound to a chain connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundSigner {
    address: Address,
}

impl BoundSigner {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

/// A loose reference to a signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerRef {
    ByAddress(Address),
    ByRole(String),
    Bound(BoundSigner),
}

impl From<Address> for SignerRef {
    fn from(address: Address) -> Self {
        Self::ByAddress(address)
    }
}

impl From<BoundSigner> for SignerRef {
    fn from(signer: BoundSigner) -> Self {
        Self::Bound(signer)
    }
}

impl From<&str> for SignerRef {
    fn from(s: &str) -> Self {
        match s.parse::<Address>() {
            Ok(address) => Self::ByAddress(address),
            Err(_) => Self::ByRole(s.to_owned()),
        }
    }
}

impl FromStr for SignerRef {
    type Err = Infallible;

    /// Anything that parses as an address is an address, everything else is a role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

/// Account a named role points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AccountRef {
    /// Index into the accounts exposed by the node.
    Index(usize),
    Address(Address),
}

/// Role name to account table, e.g. `deployer = 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct NamedAccounts(BTreeMap<String, AccountRef>);

impl NamedAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: impl Into<String>, account: AccountRef) -> Self {
        self.insert(role, account);
        self
    }

    pub fn insert(&mut self, role: impl Into<String>, account: AccountRef) {
        self.0.insert(role.into(), account);
    }

    pub fn get(&self, role: &str) -> Option<AccountRef> {
        self.0.get(role).copied()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("unknown named account: {0}")]
    UnknownRole(String),
    #[error("{0}")]
    Chain(#[from] ChainError),
}

/// Turns [`SignerRef`]s into [`BoundSigner`]s.
#[derive(Debug, Clone, Default)]
pub struct SignerResolver {
    named_accounts: NamedAccounts,
}

impl SignerResolver {
    pub fn new(named_accounts: NamedAccounts) -> Self {
        Self { named_accounts }
    }

    pub fn named_accounts(&self) -> &NamedAccounts {
        &self.named_accounts
    }

    pub async fn resolve(
        &self,
        chain: &impl Chain,
        signer: SignerRef,
    ) -> Result<BoundSigner, SignerError> {
        let address = match signer {
            SignerRef::Bound(signer) => return Ok(signer),
            SignerRef::ByAddress(address) => address,
            SignerRef::ByRole(role) => self.role_address(chain, &role).await?,
        };
        Ok(chain.bind_signer(address).await?)
    }

    /// Looks up the address a named role points to.
    pub async fn role_address(
        &self,
        chain: &impl Chain,
        role: &str,
    ) -> Result<Address, SignerError> {
        match self.named_accounts.get(role) {
            Some(AccountRef::Address(address)) => Ok(address),
            Some(AccountRef::Index(index)) => {
                let accounts = chain.accounts().await?;
                debug!(@grey, "named account {role} is account #{index} of {}", accounts.len());
                accounts
                    .get(index)
                    .copied()
                    .ok_or_else(|| SignerError::UnknownRole(role.to_owned()))
            }
            None => Err(SignerError::UnknownRole(role.to_owned())),
        }
    }
}
