// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Source verification on a block explorer.

use alloy::primitives::{Address, Bytes};

use crate::{
    core::{artifact::Libraries, explorer::ExplorerError, ledger::DeploymentRecord},
    utils::color::Color,
};

/// Environment variable that enables verification when set to `1`.
pub const VERIFY_CONTRACTS_ENV: &str = "VERIFY_CONTRACTS";

#[derive(Debug, Default)]
pub struct VerificationConfig {
    pub enabled: bool,
}

impl VerificationConfig {
    /// Reads [`VERIFY_CONTRACTS_ENV`] once.
    pub fn from_env() -> Self {
        let enabled = std::env::var(VERIFY_CONTRACTS_ENV).is_ok_and(|value| value == "1");
        Self { enabled }
    }
}

/// Everything an explorer needs to match a deployment against its sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub address: Address,
    /// Fully qualified contract name, `<source>:<Name>`.
    pub contract: String,
    /// ABI-encoded constructor arguments.
    pub constructor_args: Bytes,
    pub libraries: Libraries,
}

/// A source verification service.
#[allow(async_fn_in_trait)]
pub trait Explorer {
    async fn submit(&self, request: &VerificationRequest) -> Result<(), ExplorerError>;
}

/// Submits verification requests when enabled, and does nothing otherwise.
#[derive(Debug)]
pub struct Verifier<E> {
    config: VerificationConfig,
    explorer: E,
}

impl<E: Explorer> Verifier<E> {
    pub fn new(config: VerificationConfig, explorer: E) -> Self {
        Self { config, explorer }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn explorer(&self) -> &E {
        &self.explorer
    }

    pub async fn verify(
        &self,
        address: Address,
        contract: &str,
        constructor_args: Bytes,
        libraries: Libraries,
    ) -> Result<(), VerificationError> {
        if !self.config.enabled {
            return Ok(());
        }
        info!(@grey, "verifying {contract} at {}", address.lavender());
        let request = VerificationRequest {
            address,
            contract: contract.to_owned(),
            constructor_args,
            libraries,
        };
        self.explorer.submit(&request).await?;
        Ok(())
    }

    /// Verifies a recorded deployment, optionally against a different contract path.
    pub async fn verify_deployment(
        &self,
        record: &DeploymentRecord,
        contract: Option<&str>,
    ) -> Result<(), VerificationError> {
        self.verify(
            record.address,
            contract.unwrap_or(&record.contract),
            record.args.clone(),
            record.libraries.clone(),
        )
        .await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("{0}")]
    Explorer(#[from] ExplorerError),
}
