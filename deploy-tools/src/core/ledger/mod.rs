// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Persisted record of deployments, keyed by logical name.

use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, Bytes},
};
use serde::{Deserialize, Serialize};

use crate::core::{artifact::Libraries, chain::ReceiptMetadata};

pub use file::FileLedger;
pub use memory::MemoryLedger;

mod file;
mod memory;

/// A successful deployment of a logical contract on one network.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub address: Address,
    pub abi: JsonAbi,
    /// Fully qualified name of the artifact the contract was created from.
    pub contract: String,
    /// ABI-encoded constructor arguments.
    #[serde(default)]
    pub args: Bytes,
    #[serde(default)]
    pub libraries: Libraries,
    pub receipt: ReceiptMetadata,
}

/// Network-scoped deployment store.
///
/// A name maps to at most one record. Records are written once by the deployment
/// orchestrator and only read afterwards.
pub trait Ledger {
    /// Network the records belong to.
    fn network(&self) -> &str;

    fn get(&self, name: &str) -> Result<Option<DeploymentRecord>, LedgerError>;

    fn upsert(&mut self, name: &str, record: DeploymentRecord) -> Result<(), LedgerError>;

    /// Names of all recorded deployments, sorted.
    fn names(&self) -> Result<Vec<String>, LedgerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid deployment name: {0:?}")]
    InvalidName(String),
}

fn check_name(name: &str) -> Result<(), LedgerError> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', ':'])
        || name.chars().any(char::is_control);
    if invalid {
        return Err(LedgerError::InvalidName(name.to_owned()));
    }
    Ok(())
}
