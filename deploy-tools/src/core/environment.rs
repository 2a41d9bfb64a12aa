// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! A chain, its ledger and the artifacts deployed to it.

use alloy::{
    dyn_abi::DynSolValue,
    primitives::Address,
    providers::{DynProvider, Provider},
};

use crate::{
    config::{Config, NetworkConfig},
    core::{
        artifact::ArtifactStore,
        chain::{Chain, ChainError},
        contract::{self, ContractHandle, ContractOptions, ResolveError},
        deployment::{
            DeployOptions, DeployedContract, Deployer, DeploymentConfig, DeploymentError,
        },
        explorer::EtherscanExplorer,
        ledger::{FileLedger, Ledger},
        rpc::RpcChain,
        signer::{BoundSigner, SignerError, SignerRef, SignerResolver},
        validation::{self, ValidationError},
        verification::{VerificationConfig, Verifier},
    },
    error::Result,
};

/// Shared state of a deployment script.
#[derive(Debug)]
pub struct Environment<C, L> {
    pub chain: C,
    pub ledger: L,
    pub artifacts: ArtifactStore,
    pub signers: SignerResolver,
    pub config: DeploymentConfig,
}

impl<C: Chain, L: Ledger> Environment<C, L> {
    pub fn new(chain: C, ledger: L, artifacts: ArtifactStore, signers: SignerResolver) -> Self {
        Self {
            chain,
            ledger,
            artifacts,
            signers,
            config: DeploymentConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DeploymentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn network(&self) -> &str {
        self.ledger.network()
    }

    pub fn deployer(&mut self) -> Deployer<'_, C, L> {
        Deployer {
            chain: &self.chain,
            ledger: &mut self.ledger,
            artifacts: &self.artifacts,
            signers: &self.signers,
            config: &self.config,
        }
    }

    pub async fn deploy(
        &mut self,
        name: &str,
        args: &[DynSolValue],
        options: DeployOptions,
    ) -> Result<DeployedContract, DeploymentError> {
        self.deployer().deploy(name, args, options).await
    }

    pub async fn get_contract(
        &self,
        name: &str,
        options: ContractOptions,
    ) -> Result<ContractHandle, ResolveError> {
        contract::get_contract(&self.ledger, &self.chain, &self.signers, name, options).await
    }

    pub fn deployment_address(&self, name: &str) -> Result<Address, ResolveError> {
        contract::deployment_address(&self.ledger, name)
    }

    pub async fn resolve_signer(
        &self,
        signer: impl Into<SignerRef>,
    ) -> Result<BoundSigner, SignerError> {
        self.signers.resolve(&self.chain, signer.into()).await
    }

    pub async fn is_contract(&self, address: Address) -> Result<bool, ChainError> {
        validation::is_contract(&self.chain, address).await
    }

    pub async fn is_underlying_token(
        &self,
        label: &str,
        address: &str,
    ) -> Result<Address, ValidationError> {
        validation::is_underlying_token(&self.chain, label, address).await
    }
}

impl Environment<RpcChain<DynProvider>, FileLedger> {
    /// Connects to `network` as described by `config`.
    pub async fn from_config(config: &Config, network: &str) -> Result<Self> {
        let network_config = config.network(network)?;
        let key = network_config.private_key()?;
        let chain = RpcChain::connect(network_config.url(), key).await?;
        Self::from_chain(config, network, chain).await
    }

    /// Connects to the config's `default_network`.
    pub async fn from_default_network(config: &Config) -> Result<Self> {
        Self::from_config(config, &config.default_network).await
    }

    /// Sets up `network` over an existing connection.
    ///
    /// Fails when the node's chain id differs from the configured one.
    pub async fn from_chain(
        config: &Config,
        network: &str,
        chain: RpcChain<DynProvider>,
    ) -> Result<Self> {
        let network_config = config.network(network)?;
        let chain_id = chain
            .provider()
            .get_chain_id()
            .await
            .map_err(ChainError::from)?;
        network_config.check_chain_id(network, chain_id)?;

        let ledger = FileLedger::open(&config.paths.deployments, network)?;
        let artifacts = ArtifactStore::new(&config.paths.artifacts);
        let signers = SignerResolver::new(config.named_accounts.clone());
        info!(@grey, "using network {network} (chain {chain_id}) at {}", network_config.url());

        let deployment = DeploymentConfig {
            confirmations: network_config.confirmations(),
            ..Default::default()
        };
        Ok(Self::new(chain, ledger, artifacts, signers).with_config(deployment))
    }
}

/// Verifier for a network's configured explorer, gated by [`VerificationConfig::from_env`].
///
/// Returns `None` when the network has no explorer.
pub fn etherscan_verifier(
    network: &NetworkConfig,
    artifacts: &ArtifactStore,
) -> Option<Verifier<EtherscanExplorer>> {
    let explorer = EtherscanExplorer::from_config(network.explorer.clone()?, artifacts.clone());
    Some(Verifier::new(VerificationConfig::from_env(), explorer))
}
