// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Creation code for a deployment transaction.

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
    json_abi::Constructor,
    primitives::Bytes,
};
use eyre::{Context, ErrReport};

use super::DeploymentError;
use crate::core::artifact::{Artifact, Libraries};

/// Linked bytecode followed by the encoded constructor arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationCode {
    pub initcode: Bytes,
    pub encoded_args: Bytes,
}

impl CreationCode {
    pub fn new(
        name: &str,
        artifact: &Artifact,
        libraries: &Libraries,
        args: &[DynSolValue],
    ) -> Result<Self, DeploymentError> {
        let invalid = |reason: String| DeploymentError::InvalidConstructor {
            name: name.to_owned(),
            reason,
        };

        let encoded_args = match artifact.abi.constructor() {
            None if args.is_empty() => Vec::new(),
            None => {
                return Err(invalid(format!(
                    "no constructor, but {} arguments were given",
                    args.len()
                )))
            }
            Some(constructor) => {
                if constructor.inputs.len() != args.len() {
                    return Err(invalid(format!(
                        "mismatch number of constructor arguments (want {}; got {})",
                        constructor.inputs.len(),
                        args.len(),
                    )));
                }
                constructor
                    .abi_encode_input(args)
                    .map_err(|err| invalid(err.to_string()))?
            }
        };

        let mut initcode = artifact.link(libraries)?.to_vec();
        initcode.extend_from_slice(&encoded_args);
        Ok(Self {
            initcode: initcode.into(),
            encoded_args: encoded_args.into(),
        })
    }
}

/// Parses string arguments against the constructor's parameter types.
pub fn parse_constructor_args(
    constructor: &Constructor,
    constructor_args: &[String],
) -> Result<Vec<DynSolValue>, ErrReport> {
    if constructor_args.len() != constructor.inputs.len() {
        eyre::bail!(
            "mismatch number of constructor arguments (want {}; got {})",
            constructor.inputs.len(),
            constructor_args.len(),
        );
    }

    let mut arg_values = Vec::<DynSolValue>::with_capacity(constructor_args.len());
    for (arg, param) in constructor_args.iter().zip(constructor.inputs.iter()) {
        let ty = param
            .resolve()
            .wrap_err_with(|| format!("could not resolve constructor arg: {param}"))?;
        let value = ty
            .coerce_str(arg)
            .wrap_err_with(|| format!("could not parse constructor arg: {param}"))?;
        arg_values.push(value);
    }
    Ok(arg_values)
}
