// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{fs, path::Path};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use deploy_tools::{
    core::{
        artifact::{placeholder, ArtifactStore, Libraries},
        ledger::{FileLedger, Ledger},
        signer::{AccountRef, NamedAccounts, SignerResolver},
    },
    ops,
    safe_call, safe_call_or,
    testing::{MockChain, MockExplorer},
    ContractOptions, DeployOptions, Environment, VerificationConfig, Verifier,
};
use eyre::Result;
use serde_json::json;

const DEPLOYER: Address = Address::repeat_byte(0xde);

fn write_artifact(
    root: &Path,
    source: &str,
    name: &str,
    artifact: serde_json::Value,
) -> Result<()> {
    let dir = root.join(source);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(format!("{name}.json")), serde_json::to_string_pretty(&artifact)?)?;
    Ok(())
}

fn write_artifacts(root: &Path) -> Result<()> {
    write_artifact(
        root,
        "contracts/Comptroller.sol",
        "Comptroller",
        json!({
            "contractName": "Comptroller",
            "sourceName": "contracts/Comptroller.sol",
            "abi": [
                {"type": "function", "name": "closeFactorMantissa", "inputs": [],
                 "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
                {"type": "function", "name": "liquidationIncentiveMantissa", "inputs": [],
                 "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"}
            ],
            "bytecode": "0x608060405234801561001057600080fd5b50",
            "linkReferences": {}
        }),
    )?;

    let math = placeholder("contracts/Math.sol:Math");
    write_artifact(
        root,
        "contracts/CErc20.sol",
        "CErc20",
        json!({
            "contractName": "CErc20",
            "sourceName": "contracts/CErc20.sol",
            "abi": [
                {"type": "constructor", "inputs": [{"name": "comptroller", "type": "address"}],
                 "stateMutability": "nonpayable"}
            ],
            "bytecode": format!("0x73{math}6080"),
            "linkReferences": {
                "contracts/Math.sol": {"Math": [{"start": 1, "length": 20}]}
            }
        }),
    )?;
    Ok(())
}

fn environment(root: &Path) -> Result<Environment<MockChain, FileLedger>> {
    let chain = MockChain::new().with_accounts([DEPLOYER]);
    environment_on(root, chain)
}

fn environment_on(root: &Path, chain: MockChain) -> Result<Environment<MockChain, FileLedger>> {
    let ledger = FileLedger::open(root.join("deployments"), "hardhat")?;
    let artifacts = ArtifactStore::new(root.join("artifacts"));
    let signers = SignerResolver::new(NamedAccounts::new().with("deployer", AccountRef::Index(0)));
    Ok(Environment::new(chain, ledger, artifacts, signers))
}

#[tokio::test]
async fn comptroller_is_deployed_once() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_artifacts(&dir.path().join("artifacts"))?;
    let mut env = environment(dir.path())?;

    let first = env.deploy("Comptroller", &[], DeployOptions::default()).await?;
    assert!(first.result().newly_deployed);
    assert_eq!(env.chain.creation_count(), 1);
    assert_eq!(env.chain.confirmations(), vec![1]);
    assert!(env.is_contract(first.address()).await?);

    let second = env.deploy("Comptroller", &[], DeployOptions::default()).await?;
    assert!(!second.result().newly_deployed);
    assert_eq!(second.address(), first.address());
    assert_eq!(env.chain.creation_count(), 1);
    Ok(())
}

#[tokio::test]
async fn records_survive_a_new_run() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_artifacts(&dir.path().join("artifacts"))?;

    let address = {
        let mut env = environment(dir.path())?;
        env.deploy("Comptroller", &[], DeployOptions::default())
            .await?
            .address()
    };

    let mut env = environment(dir.path())?;
    assert_eq!(env.ledger.names()?, vec!["Comptroller".to_owned()]);
    assert_eq!(env.deployment_address("Comptroller")?, address);

    let again = env.deploy("Comptroller", &[], DeployOptions::default()).await?;
    assert_eq!(again.address(), address);
    assert_eq!(env.chain.creation_count(), 0);
    Ok(())
}

#[tokio::test]
async fn linked_contracts_record_their_libraries() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_artifacts(&dir.path().join("artifacts"))?;
    let mut env = environment(dir.path())?;

    let comptroller = env.deploy("Comptroller", &[], DeployOptions::default()).await?;
    let args = [DynSolValue::Address(comptroller.address())];

    let err = env
        .deploy("CErc20", &args, DeployOptions::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("contracts/Math.sol:Math"));

    let math = Address::repeat_byte(0x3a);
    let libraries = Libraries::from([("Math".to_owned(), math)]);
    let options = DeployOptions::builder().libraries(libraries.clone()).build();
    let market = env.deploy("CErc20", &args, options).await?;

    let sent = env.chain.sent();
    let initcode = &sent[1].initcode;
    assert_eq!(initcode[0], 0x73);
    assert_eq!(&initcode[1..21], math.as_slice());
    let record = &market.result().record;
    assert_eq!(record.libraries, libraries);
    assert_eq!(&record.args[12..], comptroller.address().as_slice());
    Ok(())
}

#[tokio::test]
async fn unsupported_reads_fall_back() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_artifacts(&dir.path().join("artifacts"))?;
    let mut env = environment(dir.path())?;
    env.deploy("Comptroller", &[], DeployOptions::default()).await?;

    let comptroller = env
        .get_contract("Comptroller", ContractOptions::builder().signer("deployer").build())
        .await?;

    let close_factor = comptroller.function("closeFactorMantissa", &[])?;
    let mantissa = U256::from(500_000_000_000_000_000u64);
    env.chain.respond(
        comptroller.address(),
        close_factor.calldata(),
        mantissa.to_be_bytes_vec(),
    );
    let outputs = safe_call(close_factor.call(&env.chain), None).await?;
    assert_eq!(outputs, Some(vec![DynSolValue::Uint(mantissa, 256)]));

    // Unscripted calls return no data, like a contract without the accessor.
    let incentive = comptroller.function("liquidationIncentiveMantissa", &[])?;
    let fallback = vec![DynSolValue::Uint(U256::ZERO, 256)];
    let outputs = safe_call_or(incentive.call(&env.chain), fallback.clone()).await?;
    assert_eq!(outputs, fallback);
    assert_eq!(safe_call(incentive.call(&env.chain), None).await?, None);

    env.chain
        .revert(comptroller.address(), incentive.calldata(), Vec::<u8>::new());
    assert!(safe_call(incentive.call(&env.chain), None).await.is_err());
    Ok(())
}

#[tokio::test]
async fn deployments_are_verified_only_when_enabled() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_artifacts(&dir.path().join("artifacts"))?;
    let mut env = environment(dir.path())?;
    let deployed = env.deploy("Comptroller", &[], DeployOptions::default()).await?;

    let disabled = Verifier::new(VerificationConfig::default(), MockExplorer::default());
    ops::verify_all(&env.ledger, &disabled).await?;
    assert!(disabled.explorer().submissions().is_empty());

    let enabled = Verifier::new(VerificationConfig { enabled: true }, MockExplorer::default());
    ops::verify_all(&env.ledger, &enabled).await?;
    let submissions = enabled.explorer().submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].address, deployed.address());
    assert_eq!(submissions[0].contract, "contracts/Comptroller.sol:Comptroller");
    Ok(())
}

#[tokio::test]
async fn underlying_tokens_must_be_contracts() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_artifacts(&dir.path().join("artifacts"))?;
    let mut env = environment(dir.path())?;
    let token = env.deploy("Comptroller", &[], DeployOptions::default()).await?;

    let address = env
        .is_underlying_token("cUSDC", &token.address().to_string())
        .await?;
    assert_eq!(address, token.address());

    let err = env
        .is_underlying_token("cUSDC", &DEPLOYER.to_string())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("cUSDC"));
    Ok(())
}
