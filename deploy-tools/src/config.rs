// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! deploy.toml definitions.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use serde::{Deserialize, Serialize};

use crate::core::{chain::DEFAULT_CONFIRMATIONS, signer::NamedAccounts};

/// Default filename for deployment configuration.
pub const FILENAME: &str = "deploy.toml";

/// Network used when none is configured.
pub const DEFAULT_NETWORK: &str = "hardhat";

const DEFAULT_URL: &str = "http://127.0.0.1:8545";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_network")]
    pub default_network: String,
    #[serde(default)]
    pub named_accounts: NamedAccounts,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_network: default_network(),
            named_accounts: NamedAccounts::default(),
            networks: BTreeMap::new(),
            paths: PathsConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Looks up a network, falling back to a local node for the default network.
    pub fn network(&self, name: &str) -> Result<NetworkConfig, ConfigError> {
        match self.networks.get(name) {
            Some(network) => Ok(network.clone()),
            None if name == DEFAULT_NETWORK => Ok(NetworkConfig::default()),
            None => Err(ConfigError::UnknownNetwork(name.to_owned())),
        }
    }
}

fn default_network() -> String {
    DEFAULT_NETWORK.to_owned()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
    pub url: Option<String>,
    pub chain_id: Option<u64>,
    pub confirmations: Option<u64>,
    /// Environment variable holding the deployer's private key. Without one, the node signs.
    pub private_key_env: Option<String>,
    pub explorer: Option<ExplorerConfig>,
}

impl NetworkConfig {
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_URL)
    }

    pub fn confirmations(&self) -> u64 {
        self.confirmations.unwrap_or(DEFAULT_CONFIRMATIONS)
    }

    /// Reads the local signing key, if the network uses one.
    pub fn private_key(&self) -> Result<Option<PrivateKeySigner>, ConfigError> {
        let Some(var) = &self.private_key_env else {
            return Ok(None);
        };
        let key = std::env::var(var).map_err(|_| ConfigError::MissingEnv(var.clone()))?;
        let signer = key
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|err| ConfigError::InvalidPrivateKey {
                var: var.clone(),
                reason: err.to_string(),
            })?;
        Ok(Some(signer))
    }

    /// Fails when the node reports a different chain than the one configured.
    pub fn check_chain_id(&self, network: &str, actual: u64) -> Result<(), ConfigError> {
        match self.chain_id {
            Some(expected) if expected != actual => Err(ConfigError::ChainIdMismatch {
                network: network.to_owned(),
                expected,
                actual,
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExplorerConfig {
    pub api_url: String,
    pub browser_url: Option<String>,
    #[serde(default)]
    pub api_key: String,
}

impl ExplorerConfig {
    /// Page for `address` on the explorer's website.
    pub fn address_url(&self, address: Address) -> Option<String> {
        let browser_url = self.browser_url.as_deref()?.trim_end_matches('/');
        Some(format!("{browser_url}/address/{address}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathsConfig {
    #[serde(default = "default_artifacts")]
    pub artifacts: PathBuf,
    #[serde(default = "default_deployments")]
    pub deployments: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            artifacts: default_artifacts(),
            deployments: default_deployments(),
        }
    }
}

fn default_artifacts() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_deployments() -> PathBuf {
    PathBuf::from("deployments")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml read error: {0}")]
    TomlRead(#[from] toml::de::Error),

    #[error("missing {}", .0.display())]
    Missing(PathBuf),
    #[error("unknown network: {0}")]
    UnknownNetwork(String),
    #[error("value in environment variable {0} is not available")]
    MissingEnv(String),
    #[error("invalid private key in {var}: {reason}")]
    InvalidPrivateKey { var: String, reason: String },
    #[error("network {network} expects chain id {expected}, but the node reports {actual}")]
    ChainIdMismatch {
        network: String,
        expected: u64,
        actual: u64,
    },
}
