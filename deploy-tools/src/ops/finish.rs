// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use alloy::primitives::TxHash;

use crate::{
    core::chain::{Chain, ReceiptMetadata},
    utils::color::DebugColor,
};

/// Waits until a submitted transaction has `confirms` confirmations.
pub async fn ensure_finished(
    chain: &impl Chain,
    tx_hash: TxHash,
    confirms: u64,
) -> eyre::Result<ReceiptMetadata> {
    let receipt = chain.wait_for_receipt(tx_hash, confirms.max(1)).await?;
    if !receipt.status {
        eyre::bail!("transaction {} reverted", tx_hash.debug_red());
    }
    debug!(@grey, "tx {} finished in block {:?}", tx_hash.debug_lavender(), receipt.block_number);
    Ok(receipt)
}
