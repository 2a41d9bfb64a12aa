// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

pub mod artifact;
pub mod call;
pub mod chain;
pub mod contract;
pub mod deployment;
pub mod environment;
pub mod explorer;
pub mod ledger;
pub mod rpc;
pub mod signer;
pub mod validation;
pub mod verification;
