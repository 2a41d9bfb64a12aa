// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Contract resolution.

use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    json_abi::{Function, JsonAbi},
    primitives::{Address, Bytes},
};
use typed_builder::TypedBuilder;

use crate::{
    core::{
        artifact::Libraries,
        call::CallOutcome,
        chain::Chain,
        ledger::{Ledger, LedgerError},
        signer::{BoundSigner, SignerError, SignerRef, SignerResolver},
    },
    utils::color::Color,
};

/// A deployed contract bound to a signer.
///
/// Handles are only built from ledger records, so the address always belongs to a known
/// deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractHandle {
    address: Address,
    abi: JsonAbi,
    signer: BoundSigner,
}

impl ContractHandle {
    pub(crate) fn new(address: Address, abi: JsonAbi, signer: BoundSigner) -> Self {
        Self {
            address,
            abi,
            signer,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    pub fn signer(&self) -> BoundSigner {
        self.signer
    }

    /// Prepares a call to `function`, picking the overload that takes `args.len()` inputs.
    pub fn function(
        &self,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<ContractCall, ResolveError> {
        let overloads = self
            .abi
            .function(function)
            .ok_or_else(|| ResolveError::UnknownFunction {
                address: self.address,
                function: function.to_owned(),
            })?;
        let function = overloads
            .iter()
            .find(|f| f.inputs.len() == args.len())
            .ok_or_else(|| ResolveError::UnknownFunction {
                address: self.address,
                function: format!("{function} with {} arguments", args.len()),
            })?;
        let input = function.abi_encode_input(args)?;
        Ok(ContractCall {
            function: function.clone(),
            from: self.signer.address(),
            to: self.address,
            input: input.into(),
        })
    }
}

/// An encoded call to a contract function.
#[derive(Debug, Clone)]
pub struct ContractCall {
    function: Function,
    from: Address,
    to: Address,
    input: Bytes,
}

impl ContractCall {
    pub fn calldata(&self) -> &Bytes {
        &self.input
    }

    /// Executes the call as a read and decodes the outputs.
    pub async fn call(&self, chain: &impl Chain) -> CallOutcome<Vec<DynSolValue>> {
        chain
            .call(Some(self.from), self.to, self.input.clone())
            .await
            .and_then(|data| {
                CallOutcome::decode(data, |data| self.function.abi_decode_output(data))
            })
    }
}

/// ABI to use instead of a deployment's own.
#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceOverride {
    /// Use this ABI verbatim.
    Abi(JsonAbi),
    /// Borrow the recorded ABI of another deployment.
    Named(String),
}

impl From<JsonAbi> for InterfaceOverride {
    fn from(abi: JsonAbi) -> Self {
        Self::Abi(abi)
    }
}

impl From<&str> for InterfaceOverride {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct ContractOptions {
    #[builder(default, setter(strip_option, into))]
    pub iface: Option<InterfaceOverride>,
    #[builder(setter(into))]
    pub signer: SignerRef,
    /// Accepted for parity with deployment options; resolved handles are never linked.
    #[builder(default)]
    pub libraries: Libraries,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no deployment found for {0}")]
    NotFound(String),
    #[error("contract at {address} has no function {function}")]
    UnknownFunction { address: Address, function: String },
    #[error("abi error: {0}")]
    Abi(#[from] alloy::dyn_abi::Error),

    #[error("{0}")]
    Signer(#[from] SignerError),
    #[error("{0}")]
    Ledger(#[from] LedgerError),
}

/// Resolves a logical name into a handle at its recorded address.
pub async fn get_contract(
    ledger: &impl Ledger,
    chain: &impl Chain,
    signers: &SignerResolver,
    name: &str,
    options: ContractOptions,
) -> Result<ContractHandle, ResolveError> {
    let record = ledger
        .get(name)?
        .ok_or_else(|| ResolveError::NotFound(name.to_owned()))?;

    let abi = match options.iface {
        None => record.abi,
        Some(InterfaceOverride::Abi(abi)) => abi,
        Some(InterfaceOverride::Named(iface)) => {
            debug!(@grey, "using the {iface} interface for {name}");
            ledger
                .get(&iface)?
                .ok_or(ResolveError::NotFound(iface))?
                .abi
        }
    };

    if !options.libraries.is_empty() {
        warn!(@yellow, "ignoring libraries when resolving {name}");
    }

    let signer = signers.resolve(chain, options.signer).await?;
    debug!(@grey, "resolved {name} at {} for {}", record.address.lavender(), signer.address());
    Ok(ContractHandle::new(record.address, abi, signer))
}

/// Address recorded for a logical name.
pub fn deployment_address(ledger: &impl Ledger, name: &str) -> Result<Address, ResolveError> {
    ledger
        .get(name)?
        .map(|record| record.address)
        .ok_or_else(|| ResolveError::NotFound(name.to_owned()))
}
