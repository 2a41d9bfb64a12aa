// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Etherscan-compatible explorer client.

use alloy::primitives::Address;
use serde::Deserialize;

use crate::{
    config::ExplorerConfig,
    core::{
        artifact::{ArtifactError, ArtifactStore, BuildInfo},
        verification::{Explorer, VerificationRequest},
    },
    utils::color::Color,
};

const CODE_FORMAT: &str = "solidity-standard-json-input";

#[derive(Debug, Clone)]
pub struct EtherscanExplorer {
    client: reqwest::Client,
    config: ExplorerConfig,
    artifacts: ArtifactStore,
}

impl EtherscanExplorer {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        artifacts: ArtifactStore,
    ) -> Self {
        let config = ExplorerConfig {
            api_url: api_url.into(),
            browser_url: None,
            api_key: api_key.into(),
        };
        Self::from_config(config, artifacts)
    }

    pub fn from_config(config: ExplorerConfig, artifacts: ArtifactStore) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            artifacts,
        }
    }

    pub fn with_browser_url(mut self, browser_url: impl Into<String>) -> Self {
        self.config.browser_url = Some(browser_url.into());
        self
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Explorer page of `address`, when a browser URL is configured.
    pub fn address_url(&self, address: Address) -> Option<String> {
        self.config.address_url(address)
    }
}

impl Explorer for EtherscanExplorer {
    async fn submit(&self, request: &VerificationRequest) -> Result<(), ExplorerError> {
        let build_info = self.artifacts.build_info(&request.contract)?;
        let form = verification_form(request, &build_info, &self.config.api_key)?;
        debug!(@grey, "submitting {} to {}", request.contract, self.api_url());

        let response: ExplorerResponse = self
            .client
            .post(self.api_url())
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response.check(request.address)?;
        info!(@grey,
            "submitted {} for verification (guid: {})",
            request.address.lavender(),
            response.result
        );
        if let Some(url) = self.address_url(request.address) {
            info!(@grey, "view it at {url}");
        }
        Ok(())
    }
}

/// Form fields of a `verifysourcecode` request.
pub fn verification_form(
    request: &VerificationRequest,
    build_info: &BuildInfo,
    api_key: &str,
) -> Result<Vec<(String, String)>, ExplorerError> {
    let mut form = vec![
        ("apikey".to_owned(), api_key.to_owned()),
        ("module".to_owned(), "contract".to_owned()),
        ("action".to_owned(), "verifysourcecode".to_owned()),
        ("contractaddress".to_owned(), request.address.to_string()),
        (
            "sourceCode".to_owned(),
            serde_json::to_string(&build_info.input)?,
        ),
        ("codeformat".to_owned(), CODE_FORMAT.to_owned()),
        ("contractname".to_owned(), request.contract.clone()),
        (
            "compilerversion".to_owned(),
            format!("v{}", build_info.solc_long_version),
        ),
        // The misspelling is part of the API.
        (
            "constructorArguements".to_owned(),
            hex::encode(&request.constructor_args),
        ),
    ];
    for (i, (library, address)) in request.libraries.iter().enumerate() {
        let name = library.rsplit(':').next().unwrap_or(library);
        form.push((format!("libraryname{}", i + 1), name.to_owned()));
        form.push((format!("libraryaddress{}", i + 1), address.to_string()));
    }
    Ok(form)
}

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: String,
}

impl ExplorerResponse {
    fn check(&self, address: Address) -> Result<(), ExplorerError> {
        if self.status == "1" {
            return Ok(());
        }
        if self.result.to_lowercase().contains("already verified") {
            return Err(ExplorerError::AlreadyVerified(address));
        }
        let reason = match self.result.is_empty() {
            true => self.message.clone(),
            false => self.result.clone(),
        };
        Err(ExplorerError::Rejected { address, reason })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Artifact(#[from] ArtifactError),

    #[error("verification of {address} rejected: {reason}")]
    Rejected { address: Address, reason: String },
    #[error("contract {0} is already verified")]
    AlreadyVerified(Address),
}
