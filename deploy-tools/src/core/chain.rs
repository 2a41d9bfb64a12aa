// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Chain connection used by the deployment layer.

use alloy::{
    primitives::{Address, BlockHash, Bytes, TxHash},
    rpc::types::TransactionReceipt,
};
use serde::{Deserialize, Serialize};

use crate::core::{call::CallOutcome, signer::BoundSigner};

/// Number of confirmations awaited for a deployment unless configured otherwise.
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// Operations the deployment layer needs from a network connection.
///
/// Implemented by [`RpcChain`](crate::core::rpc::RpcChain) for real networks and by
/// [`MockChain`](crate::testing::MockChain) for tests.
#[allow(async_fn_in_trait)]
pub trait Chain {
    /// Deployed bytecode at `address`, empty for accounts without code.
    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError>;

    /// Accounts exposed by the node, used to resolve indexed named accounts.
    async fn accounts(&self) -> Result<Vec<Address>, ChainError>;

    /// Binds a signing identity for `address`.
    ///
    /// The node may sign on behalf of the address (unlocked or impersonated accounts).
    async fn bind_signer(&self, address: Address) -> Result<BoundSigner, ChainError>;

    /// Executes a read-only call and returns the raw return data.
    async fn call(&self, from: Option<Address>, to: Address, input: Bytes) -> CallOutcome<Bytes>;

    /// Submits a contract-creation transaction.
    async fn send_creation(&self, from: Address, initcode: Bytes) -> Result<TxHash, ChainError>;

    /// Blocks until `tx_hash` has at least `confirmations` confirmations.
    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<ReceiptMetadata, ChainError>;
}

/// The parts of a transaction receipt kept in the deployment ledger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptMetadata {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub block_hash: Option<BlockHash>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    pub contract_address: Option<Address>,
    pub status: bool,
}

impl From<&TransactionReceipt> for ReceiptMetadata {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            block_hash: receipt.block_hash,
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
            contract_address: receipt.contract_address,
            status: receipt.status(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("rpc error: {0}")]
    Rpc(#[from] alloy::transports::RpcError<alloy::transports::TransportErrorKind>),
    #[error("{0}")]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),
    #[error("transaction rejected: {0}")]
    Rejected(String),
    #[error("no receipt for transaction {0}")]
    UnknownTransaction(TxHash),
}
