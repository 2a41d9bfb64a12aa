// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use crate::core::{
    chain::Chain,
    contract::{ContractHandle, ContractOptions},
    environment::Environment,
    ledger::Ledger,
    signer::DEFAULT_DEPLOYER_ROLE,
};

/// Artifact with the combined proxy and implementation ABI.
pub const UNITROLLER_COMPTROLLER: &str = "UnitrollerComptroller";

/// The `Unitroller` proxy, addressed through the comptroller's ABI.
pub async fn unitroller<C: Chain, L: Ledger>(
    env: &Environment<C, L>,
) -> eyre::Result<ContractHandle> {
    let iface = env.artifacts.load(UNITROLLER_COMPTROLLER)?.abi;
    let options = ContractOptions::builder()
        .signer(DEFAULT_DEPLOYER_ROLE)
        .iface(iface)
        .build();
    Ok(env.get_contract("Unitroller", options).await?)
}
