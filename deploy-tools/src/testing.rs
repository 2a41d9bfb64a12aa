// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! In-memory chain and explorer for tests.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use alloy::{
    json_abi::JsonAbi,
    primitives::{keccak256, Address, Bytes, TxHash},
};

use crate::core::{
    artifact::Artifact,
    call::{CallOutcome, Revert},
    chain::{Chain, ChainError, ReceiptMetadata},
    explorer::ExplorerError,
    signer::BoundSigner,
    verification::{Explorer, VerificationRequest},
};

const BASE_GAS: u64 = 53_000;

/// A contract-creation transaction seen by [`MockChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCreation {
    pub from: Address,
    pub initcode: Bytes,
    pub tx_hash: TxHash,
}

#[derive(Debug, Clone)]
enum Response {
    Data(Bytes),
    Revert(Bytes),
}

#[derive(Debug, Default)]
struct State {
    accounts: Vec<Address>,
    code: HashMap<Address, Bytes>,
    responses: HashMap<(Address, Bytes), Response>,
    nonces: HashMap<Address, u64>,
    receipts: HashMap<TxHash, ReceiptMetadata>,
    sent: Vec<SentCreation>,
    confirmations: Vec<u64>,
    reject_next: Option<String>,
    revert_next: bool,
    block_number: u64,
}

/// Scriptable [`Chain`] that records what it is asked to do.
///
/// Calls without a scripted response return empty data, like a call to an account without
/// code.
#[derive(Debug, Default)]
pub struct MockChain {
    state: Mutex<State>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(self, accounts: impl IntoIterator<Item = Address>) -> Self {
        self.state().accounts = accounts.into_iter().collect();
        self
    }

    pub fn set_code(&self, address: Address, code: impl AsRef<[u8]>) {
        self.state()
            .code
            .insert(address, Bytes::copy_from_slice(code.as_ref()));
    }

    /// Returns `data` for calls to `to` with exactly `calldata`.
    pub fn respond(&self, to: Address, calldata: impl AsRef<[u8]>, data: impl AsRef<[u8]>) {
        let key = (to, Bytes::copy_from_slice(calldata.as_ref()));
        let response = Response::Data(Bytes::copy_from_slice(data.as_ref()));
        self.state().responses.insert(key, response);
    }

    /// Reverts calls to `to` with exactly `calldata`.
    pub fn revert(&self, to: Address, calldata: impl AsRef<[u8]>, data: impl AsRef<[u8]>) {
        let key = (to, Bytes::copy_from_slice(calldata.as_ref()));
        let response = Response::Revert(Bytes::copy_from_slice(data.as_ref()));
        self.state().responses.insert(key, response);
    }

    /// Rejects the next creation transaction before it is mined.
    pub fn reject_next(&self, reason: impl Into<String>) {
        self.state().reject_next = Some(reason.into());
    }

    /// Mines the next creation transaction with a failed status.
    pub fn revert_next(&self) {
        self.state().revert_next = true;
    }

    pub fn sent(&self) -> Vec<SentCreation> {
        self.state().sent.clone()
    }

    pub fn creation_count(&self) -> usize {
        self.state().sent.len()
    }

    /// Confirmation counts passed to every receipt wait, in order.
    pub fn confirmations(&self) -> Vec<u64> {
        self.state().confirmations.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Chain for MockChain {
    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError> {
        Ok(self.state().code.get(&address).cloned().unwrap_or_default())
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        Ok(self.state().accounts.clone())
    }

    async fn bind_signer(&self, address: Address) -> Result<BoundSigner, ChainError> {
        Ok(BoundSigner::new(address))
    }

    async fn call(&self, _from: Option<Address>, to: Address, input: Bytes) -> CallOutcome<Bytes> {
        match self.state().responses.get(&(to, input)) {
            Some(Response::Data(data)) => CallOutcome::Ok(data.clone()),
            Some(Response::Revert(data)) => CallOutcome::Reverted(Revert::new(data.clone())),
            None => CallOutcome::Ok(Bytes::new()),
        }
    }

    async fn send_creation(&self, from: Address, initcode: Bytes) -> Result<TxHash, ChainError> {
        let mut state = self.state();
        if let Some(reason) = state.reject_next.take() {
            return Err(ChainError::Rejected(reason));
        }

        let nonce = state.nonces.entry(from).or_default();
        let address = from.create(*nonce);
        *nonce += 1;

        let mut preimage = address.to_vec();
        preimage.extend_from_slice(&initcode);
        let tx_hash = keccak256(preimage);

        let status = !std::mem::take(&mut state.revert_next);
        if status {
            state.code.insert(address, initcode.clone());
        }
        state.block_number += 1;
        let receipt = ReceiptMetadata {
            transaction_hash: tx_hash,
            block_number: Some(state.block_number),
            block_hash: Some(keccak256(state.block_number.to_be_bytes())),
            gas_used: BASE_GAS + 200 * initcode.len() as u64,
            effective_gas_price: 1_000_000_000,
            contract_address: status.then_some(address),
            status,
        };
        state.receipts.insert(tx_hash, receipt);
        state.sent.push(SentCreation {
            from,
            initcode,
            tx_hash,
        });
        Ok(tx_hash)
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<ReceiptMetadata, ChainError> {
        let mut state = self.state();
        state.confirmations.push(confirmations);
        state
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or(ChainError::UnknownTransaction(tx_hash))
    }
}

/// [`Explorer`] that records submissions.
#[derive(Debug, Default)]
pub struct MockExplorer {
    submissions: Mutex<Vec<VerificationRequest>>,
    fail_next: Mutex<Option<ExplorerError>>,
}

impl MockExplorer {
    pub fn submissions(&self) -> Vec<VerificationRequest> {
        lock(&self.submissions).clone()
    }

    pub fn fail_next(&self, err: ExplorerError) {
        *lock(&self.fail_next) = Some(err);
    }
}

impl Explorer for MockExplorer {
    async fn submit(&self, request: &VerificationRequest) -> Result<(), ExplorerError> {
        lock(&self.submissions).push(request.clone());
        match lock(&self.fail_next).take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A library-free artifact with the given ABI and creation bytecode.
pub fn artifact(name: &str, abi: JsonAbi, bytecode: &str) -> Artifact {
    Artifact {
        contract_name: name.to_owned(),
        source_name: format!("contracts/{name}.sol"),
        abi,
        bytecode: bytecode.to_owned(),
        link_references: Default::default(),
    }
}
