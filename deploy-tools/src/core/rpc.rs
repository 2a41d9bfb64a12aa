// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! [`Chain`] over a JSON-RPC provider.

use alloy::{
    network::{EthereumWallet, NetworkWallet, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::{
        DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder, WalletProvider,
    },
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::RpcError,
};

use crate::{
    core::{
        call::{CallOutcome, Revert},
        chain::{Chain, ChainError, ReceiptMetadata},
        signer::BoundSigner,
    },
    utils::color::DebugColor,
};

#[derive(Debug, Clone)]
pub struct RpcChain<P> {
    provider: P,
    local_accounts: Vec<Address>,
}

impl<P> RpcChain<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            local_accounts: Vec::new(),
        }
    }

    /// Accounts signed for locally, listed ahead of the node's own accounts.
    pub fn with_local_accounts(mut self, accounts: impl IntoIterator<Item = Address>) -> Self {
        self.local_accounts.extend(accounts);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl RpcChain<DynProvider> {
    /// Connects to `url`, signing locally with `wallet` when given.
    ///
    /// Without a wallet, transactions are signed by the node, which must have the sender
    /// unlocked or impersonated.
    pub async fn connect(url: &str, wallet: Option<PrivateKeySigner>) -> Result<Self, ChainError> {
        let chain = match wallet {
            Some(signer) => {
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect(url)
                    .await?;
                let accounts = wallet_accounts(&provider);
                Self::new(provider.erased()).with_local_accounts(accounts)
            }
            None => Self::new(ProviderBuilder::new().connect(url).await?.erased()),
        };
        debug!(@grey, "connected to {url}");
        Ok(chain)
    }
}

/// Addresses the provider's wallet signs for.
pub fn wallet_accounts<P: WalletProvider>(provider: &P) -> Vec<Address> {
    provider.wallet().signer_addresses().collect()
}

impl<P: Provider> Chain for RpcChain<P> {
    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError> {
        Ok(self.provider.get_code_at(address).await?)
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        let mut accounts = self.local_accounts.clone();
        for account in self.provider.get_accounts().await? {
            if !accounts.contains(&account) {
                accounts.push(account);
            }
        }
        Ok(accounts)
    }

    async fn bind_signer(&self, address: Address) -> Result<BoundSigner, ChainError> {
        Ok(BoundSigner::new(address))
    }

    async fn call(&self, from: Option<Address>, to: Address, input: Bytes) -> CallOutcome<Bytes> {
        let mut tx = TransactionRequest::default().with_to(to).with_input(input);
        if let Some(from) = from {
            tx = tx.with_from(from);
        }
        match self.provider.call(tx).await {
            Ok(data) => CallOutcome::Ok(data),
            Err(RpcError::ErrorResp(payload)) => {
                if let Some(data) = payload.as_revert_data() {
                    CallOutcome::Reverted(Revert::new(data))
                } else if payload.message.contains("revert") {
                    CallOutcome::Reverted(Revert::default())
                } else {
                    CallOutcome::TransportError(RpcError::ErrorResp(payload).into())
                }
            }
            Err(err) => CallOutcome::TransportError(err.into()),
        }
    }

    async fn send_creation(&self, from: Address, initcode: Bytes) -> Result<TxHash, ChainError> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(initcode);
        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        debug!(@grey, "sent deploy tx: {}", tx_hash.debug_lavender());
        Ok(tx_hash)
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<ReceiptMetadata, ChainError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await?;
        Ok(ReceiptMetadata::from(&receipt))
    }
}
