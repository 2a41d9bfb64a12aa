// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Tools for deploying, resolving and verifying EVM contracts.

#[macro_use]
mod macros;

pub mod config;
pub mod core;
pub(crate) mod error;
pub mod ops;
pub mod testing;
pub mod utils;

pub use crate::core::{
    call::{safe_call, safe_call_or, CallOutcome},
    chain::Chain,
    contract::{ContractHandle, ContractOptions},
    deployment::{DeployOptions, DeployedContract},
    environment::Environment,
    signer::SignerRef,
    verification::{VerificationConfig, Verifier},
};
pub use config::Config;
pub use error::{Error, Result};
