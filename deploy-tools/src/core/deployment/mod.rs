// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Idempotent contract deployment.

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, TxHash},
};
use typed_builder::TypedBuilder;

use crate::{
    core::{
        artifact::{Artifact, ArtifactError, ArtifactStore, Libraries},
        chain::{Chain, ChainError, DEFAULT_CONFIRMATIONS},
        contract::ContractHandle,
        ledger::{DeploymentRecord, Ledger, LedgerError},
        signer::{SignerError, SignerRef, SignerResolver, DEFAULT_DEPLOYER_ROLE},
    },
    utils::{
        color::{Color, DebugColor},
        format_gas,
    },
};

pub use request::{parse_constructor_args, CreationCode};

pub mod request;

#[derive(Debug)]
pub struct DeploymentConfig {
    /// Confirmations to wait for before a deployment is recorded.
    ///
    /// Values below one are raised to one.
    pub confirmations: u64,
    /// Named role used when no sender is given.
    pub default_deployer: String,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            confirmations: DEFAULT_CONFIRMATIONS,
            default_deployer: DEFAULT_DEPLOYER_ROLE.to_owned(),
        }
    }
}

/// Artifact to create a deployment from, when it differs from the deployment name.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactSource {
    Named(String),
    Inline(Box<Artifact>),
}

impl From<&str> for ArtifactSource {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<Artifact> for ArtifactSource {
    fn from(artifact: Artifact) -> Self {
        Self::Inline(Box::new(artifact))
    }
}

#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct DeployOptions {
    /// Sender, the default deployer role if unset.
    #[builder(default, setter(strip_option, into))]
    pub from: Option<SignerRef>,
    #[builder(default, setter(strip_option, into))]
    pub contract: Option<ArtifactSource>,
    #[builder(default)]
    pub libraries: Libraries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeployResult {
    pub record: DeploymentRecord,
    /// False when an existing deployment was reused.
    pub newly_deployed: bool,
}

/// Handle to a deployed contract along with how it came to be.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployedContract {
    handle: ContractHandle,
    result: DeployResult,
}

impl DeployedContract {
    pub fn address(&self) -> Address {
        self.handle.address()
    }

    pub fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    pub fn result(&self) -> &DeployResult {
        &self.result
    }

    pub fn into_handle(self) -> ContractHandle {
        self.handle
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("failed to deploy {name}: {source}")]
    Rejected {
        name: String,
        #[source]
        source: ChainError,
    },
    #[error("deploy tx for {name} reverted {}", .tx_hash.debug_red())]
    Reverted { name: String, tx_hash: TxHash },
    #[error("missing contract address in receipt for {name} (tx {tx_hash})")]
    MissingReceiptAddress { name: String, tx_hash: TxHash },
    #[error("invalid constructor for {name}: {reason}")]
    InvalidConstructor { name: String, reason: String },

    #[error("{0}")]
    Artifact(#[from] ArtifactError),
    #[error("{0}")]
    Signer(#[from] SignerError),
    #[error("{0}")]
    Ledger(#[from] LedgerError),
}

/// Everything a deployment touches.
pub struct Deployer<'a, C, L> {
    pub chain: &'a C,
    pub ledger: &'a mut L,
    pub artifacts: &'a ArtifactStore,
    pub signers: &'a SignerResolver,
    pub config: &'a DeploymentConfig,
}

impl<C: Chain, L: Ledger> Deployer<'_, C, L> {
    /// Deploys `name` unless the ledger already has it.
    ///
    /// A new deployment is only recorded after its creation transaction has the configured
    /// number of confirmations. Failures are not retried: re-running is safe because
    /// completed deployments are skipped.
    pub async fn deploy(
        &mut self,
        name: &str,
        args: &[DynSolValue],
        options: DeployOptions,
    ) -> Result<DeployedContract, DeploymentError> {
        let from = options
            .from
            .unwrap_or_else(|| SignerRef::ByRole(self.config.default_deployer.clone()));
        let signer = self.signers.resolve(self.chain, from).await?;

        if let Some(record) = self.ledger.get(name)? {
            info!(@grey, "reusing \"{name}\" at {}", record.address.lavender());
            let handle = ContractHandle::new(record.address, record.abi.clone(), signer);
            return Ok(DeployedContract {
                handle,
                result: DeployResult {
                    record,
                    newly_deployed: false,
                },
            });
        }

        let artifact = match options.contract {
            None => self.artifacts.load(name)?,
            Some(ArtifactSource::Named(contract)) => self.artifacts.load(&contract)?,
            Some(ArtifactSource::Inline(artifact)) => *artifact,
        };
        let code = CreationCode::new(name, &artifact, &options.libraries, args)?;

        debug!(@grey, "sender address: {}", signer.address().debug_lavender());
        let rejected = |source| DeploymentError::Rejected {
            name: name.to_owned(),
            source,
        };
        let tx_hash = self
            .chain
            .send_creation(signer.address(), code.initcode)
            .await
            .map_err(rejected)?;
        info!(@grey, "deploying \"{name}\" (tx: {})...", tx_hash.debug_lavender());

        let receipt = self
            .chain
            .wait_for_receipt(tx_hash, self.config.confirmations.max(1))
            .await
            .map_err(rejected)?;
        if !receipt.status {
            return Err(DeploymentError::Reverted {
                name: name.to_owned(),
                tx_hash,
            });
        }
        let address = receipt
            .contract_address
            .ok_or_else(|| DeploymentError::MissingReceiptAddress {
                name: name.to_owned(),
                tx_hash,
            })?;

        let record = DeploymentRecord {
            address,
            abi: artifact.abi.clone(),
            contract: artifact.fully_qualified_name(),
            args: code.encoded_args,
            libraries: options.libraries,
            receipt,
        };
        self.ledger.upsert(name, record.clone())?;
        info!(@grey,
            "deployed \"{name}\" at {} with {}",
            address.lavender(),
            format_gas(record.receipt.gas_used.into())
        );

        Ok(DeployedContract {
            handle: ContractHandle::new(address, artifact.abi, signer),
            result: DeployResult {
                record,
                newly_deployed: true,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy::{json_abi::JsonAbi, primitives::U256};

    use super::*;
    use crate::{
        core::{
            ledger::{tests::record, MemoryLedger},
            signer::{AccountRef, NamedAccounts},
        },
        testing::{artifact, MockChain},
    };

    const DEPLOYER: Address = Address::repeat_byte(0xde);
    const ADMIN: Address = Address::repeat_byte(0xad);

    fn token_abi() -> JsonAbi {
        serde_json::from_str(
            r#"[{
                "type": "constructor",
                "inputs": [{"name": "supply", "type": "uint256"}],
                "stateMutability": "nonpayable"
            }]"#,
        )
        .unwrap()
    }

    struct Fixture {
        chain: MockChain,
        ledger: MemoryLedger,
        artifacts: ArtifactStore,
        signers: SignerResolver,
        config: DeploymentConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                chain: MockChain::new().with_accounts([DEPLOYER, ADMIN]),
                ledger: MemoryLedger::new("hardhat"),
                artifacts: ArtifactStore::default()
                    .with_artifact(artifact("Token", token_abi(), "0x6080604052"))
                    .with_artifact(artifact("Oracle", JsonAbi::default(), "0x60aa")),
                signers: SignerResolver::new(
                    NamedAccounts::new()
                        .with("deployer", AccountRef::Index(0))
                        .with("admin", AccountRef::Address(ADMIN)),
                ),
                config: DeploymentConfig::default(),
            }
        }

        fn deployer(&mut self) -> Deployer<'_, MockChain, MemoryLedger> {
            Deployer {
                chain: &self.chain,
                ledger: &mut self.ledger,
                artifacts: &self.artifacts,
                signers: &self.signers,
                config: &self.config,
            }
        }
    }

    fn supply() -> Vec<DynSolValue> {
        vec![DynSolValue::Uint(U256::from(1000), 256)]
    }

    #[tokio::test]
    async fn deploys_with_encoded_constructor_args() {
        let mut fx = Fixture::new();
        let deployed = fx
            .deployer()
            .deploy("Token", &supply(), DeployOptions::default())
            .await
            .unwrap();

        assert!(deployed.result().newly_deployed);
        assert_eq!(deployed.handle().signer().address(), DEPLOYER);
        let sent = fx.chain.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, DEPLOYER);
        assert!(sent[0].initcode.starts_with(&[0x60, 0x80, 0x60, 0x40, 0x52]));
        assert!(sent[0].initcode.ends_with(&U256::from(1000).to_be_bytes::<32>()));
        assert_eq!(fx.chain.confirmations(), vec![1]);

        let record = fx.ledger.get("Token").unwrap().unwrap();
        assert_eq!(record.address, deployed.address());
        assert_eq!(record.contract, "contracts/Token.sol:Token");
        assert_eq!(record.args.len(), 32);
        assert_eq!(record.receipt.transaction_hash, sent[0].tx_hash);
    }

    #[tokio::test]
    async fn existing_records_are_reused_without_transactions() {
        let mut fx = Fixture::new();
        let existing = record(Address::repeat_byte(0x77));
        fx.ledger.upsert("Token", existing.clone()).unwrap();

        let deployed = fx
            .deployer()
            .deploy("Token", &supply(), DeployOptions::default())
            .await
            .unwrap();
        assert!(!deployed.result().newly_deployed);
        assert_eq!(deployed.address(), existing.address);
        assert_eq!(deployed.result().record, existing);
        assert_eq!(fx.chain.creation_count(), 0);
    }

    #[tokio::test]
    async fn honours_sender_and_artifact_overrides() {
        let mut fx = Fixture::new();
        let options = DeployOptions::builder()
            .from("admin")
            .contract("Oracle")
            .build();
        let deployed = fx.deployer().deploy("PriceOracle", &[], options).await.unwrap();
        assert_eq!(deployed.handle().signer().address(), ADMIN);

        let record = fx.ledger.get("PriceOracle").unwrap().unwrap();
        assert_eq!(record.contract, "contracts/Oracle.sol:Oracle");
        assert_eq!(&fx.chain.sent()[0].initcode[..], &[0x60, 0xaa]);

        let inline = artifact("Inline", JsonAbi::default(), "0x60bb");
        let options = DeployOptions::builder().contract(inline).build();
        fx.deployer().deploy("Inline", &[], options).await.unwrap();
        assert_eq!(&fx.chain.sent()[1].initcode[..], &[0x60, 0xbb]);
    }

    #[tokio::test]
    async fn zero_confirmations_wait_for_one() {
        let mut fx = Fixture::new();
        fx.config.confirmations = 0;
        fx.deployer()
            .deploy("Oracle", &[], DeployOptions::default())
            .await
            .unwrap();
        assert_eq!(fx.chain.confirmations(), vec![1]);
    }

    #[tokio::test]
    async fn constructor_mismatch_fails_before_sending() {
        let mut fx = Fixture::new();
        let err = fx
            .deployer()
            .deploy("Token", &[], DeployOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeploymentError::InvalidConstructor { name, .. } if name == "Token"));

        let err = fx
            .deployer()
            .deploy("Oracle", &supply(), DeployOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeploymentError::InvalidConstructor { .. }));
        assert_eq!(fx.chain.creation_count(), 0);
    }

    #[tokio::test]
    async fn chain_failures_leave_the_ledger_untouched() {
        let mut fx = Fixture::new();
        fx.chain.reject_next("insufficient funds for gas * price + value");
        let err = fx
            .deployer()
            .deploy("Oracle", &[], DeployOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeploymentError::Rejected { name, source: ChainError::Rejected(_) } if name == "Oracle"
        ));

        fx.chain.revert_next();
        let err = fx
            .deployer()
            .deploy("Oracle", &[], DeployOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeploymentError::Reverted { .. }));
        assert!(fx.ledger.get("Oracle").unwrap().is_none());

        // Re-running recovers.
        let deployed = fx
            .deployer()
            .deploy("Oracle", &[], DeployOptions::default())
            .await
            .unwrap();
        assert!(deployed.result().newly_deployed);
        assert!(fx.ledger.get("Oracle").unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_roles_and_artifacts_fail() {
        let mut fx = Fixture::new();
        let options = DeployOptions::builder().from("guardian").build();
        let err = fx.deployer().deploy("Oracle", &[], options).await.unwrap_err();
        assert!(matches!(
            err,
            DeploymentError::Signer(SignerError::UnknownRole(role)) if role == "guardian"
        ));

        let err = fx
            .deployer()
            .deploy("Missing", &[], DeployOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeploymentError::Artifact(ArtifactError::NotFound(_))));
    }
}
