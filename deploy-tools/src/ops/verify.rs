// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use crate::core::{
    ledger::Ledger,
    verification::{Explorer, Verifier},
};

/// Submits every recorded deployment for verification.
///
/// Stops at the first failure. Does nothing when verification is disabled.
pub async fn verify_all<E: Explorer>(
    ledger: &impl Ledger,
    verifier: &Verifier<E>,
) -> eyre::Result<()> {
    if !verifier.is_enabled() {
        debug!(@grey, "verification disabled, skipping {} deployments", ledger.network());
        return Ok(());
    }
    for name in ledger.names()? {
        let Some(record) = ledger.get(&name)? else {
            continue;
        };
        verifier.verify_deployment(&record, None).await?;
    }
    Ok(())
}
