// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("{0}")]
    Chain(#[from] crate::core::chain::ChainError),
    #[error("{0}")]
    Call(#[from] crate::core::call::CallError),
    #[error("{0}")]
    Artifact(#[from] crate::core::artifact::ArtifactError),
    #[error("{0}")]
    Ledger(#[from] crate::core::ledger::LedgerError),
    #[error("{0}")]
    Signer(#[from] crate::core::signer::SignerError),
    #[error("{0}")]
    Resolve(#[from] crate::core::contract::ResolveError),
    #[error("{0}")]
    Deployment(#[from] crate::core::deployment::DeploymentError),
    #[error("{0}")]
    Verification(#[from] crate::core::verification::VerificationError),
    #[error("{0}")]
    Validation(#[from] crate::core::validation::ValidationError),
}
