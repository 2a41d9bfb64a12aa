// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Read calls and the safe-call wrapper.
//!
//! Many read accessors return no data on contracts that do not implement them. A call is only
//! considered unsupported when its return data is empty *and* decoding that data failed; every
//! other failure, including a revert without data, is surfaced to the caller.

use std::{fmt, future::Future};

use alloy::{
    primitives::Bytes,
    sol_types::{decode_revert_reason, SolInterface},
};

use crate::core::chain::ChainError;

/// Result of a read call.
#[derive(Debug)]
pub enum CallOutcome<T> {
    /// The call succeeded and its return data decoded.
    Ok(T),
    /// The call returned `0x` and the expected outputs could not be decoded from it.
    EmptyData,
    /// The call returned data that could not be decoded.
    BadData { data: Bytes, reason: String },
    /// The call reverted.
    Reverted(Revert),
    /// The call never produced a result.
    TransportError(ChainError),
}

impl<T> CallOutcome<T> {
    /// Classifies raw return data by decoding it.
    pub fn decode<E: fmt::Display>(
        data: Bytes,
        decoder: impl FnOnce(&[u8]) -> Result<T, E>,
    ) -> Self {
        match decoder(&data) {
            Ok(value) => Self::Ok(value),
            Err(_) if data.is_empty() => Self::EmptyData,
            Err(err) => Self::BadData {
                data,
                reason: err.to_string(),
            },
        }
    }

    /// Chains another classification step onto a successful outcome.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> CallOutcome<U>) -> CallOutcome<U> {
        match self {
            Self::Ok(value) => f(value),
            Self::EmptyData => CallOutcome::EmptyData,
            Self::BadData { data, reason } => CallOutcome::BadData { data, reason },
            Self::Reverted(revert) => CallOutcome::Reverted(revert),
            Self::TransportError(err) => CallOutcome::TransportError(err),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn into_result(self) -> Result<T, CallError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::EmptyData => Err(CallError::EmptyData),
            Self::BadData { data, reason } => Err(CallError::BadData { data, reason }),
            Self::Reverted(revert) => Err(CallError::Reverted(revert)),
            Self::TransportError(err) => Err(CallError::Transport(err)),
        }
    }
}

/// Data returned by a reverted call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revert {
    data: Bytes,
}

impl Revert {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Decodes the `Error(string)`, `Panic(uint256)` or custom error reason, if any.
    pub fn reason(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        decode_revert_reason(&self.data).filter(|reason| !reason.is_empty())
    }

    /// Decodes the revert data as one of a contract's custom errors.
    pub fn decode<E: SolInterface>(&self) -> Option<E> {
        E::abi_decode(&self.data).ok()
    }
}

impl fmt::Display for Revert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "execution reverted: {reason}"),
            None if self.is_empty() => write!(f, "execution reverted without data"),
            None => write!(f, "execution reverted with data {}", self.data),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("call returned no data (\"0x\"); the contract may not support it")]
    EmptyData,
    #[error("could not decode call result {data}: {reason}")]
    BadData { data: Bytes, reason: String },
    #[error("{0}")]
    Reverted(Revert),
    #[error("{0}")]
    Transport(#[from] ChainError),
}

/// Awaits a read call, absorbing the "unsupported call" outcome into `fallback`.
///
/// Returns `None` for an unsupported call when no fallback is given.
pub async fn safe_call<T>(
    call: impl Future<Output = CallOutcome<T>>,
    fallback: Option<T>,
) -> Result<Option<T>, CallError> {
    match call.await {
        CallOutcome::Ok(value) => Ok(Some(value)),
        CallOutcome::EmptyData => Ok(fallback),
        CallOutcome::BadData { data, reason } => Err(CallError::BadData { data, reason }),
        CallOutcome::Reverted(revert) => Err(CallError::Reverted(revert)),
        CallOutcome::TransportError(err) => Err(CallError::Transport(err)),
    }
}

/// Like [`safe_call`], with a required default.
pub async fn safe_call_or<T>(
    call: impl Future<Output = CallOutcome<T>>,
    default: T,
) -> Result<T, CallError> {
    let value = safe_call(call, Some(default)).await?;
    // `safe_call` only returns `None` when no fallback was passed.
    value.ok_or(CallError::EmptyData)
}
