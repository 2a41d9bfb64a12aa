// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Compiled contract artifacts.
//!
//! Artifacts are read from a Hardhat-style `artifacts/` tree, where each contract lives at
//! `<source>/<Name>.json` next to a `<Name>.dbg.json` pointing at its build info.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    json_abi::JsonAbi,
    primitives::{keccak256, Address, Bytes},
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::decode0x;

/// Library name (bare or fully qualified) to deployed address.
pub type Libraries = BTreeMap<String, Address>;

/// Source name to library name to placeholder offsets.
pub type LinkReferences = BTreeMap<String, BTreeMap<String, Vec<LinkOffset>>>;

/// Matches unlinked library placeholders left in creation bytecode.
const UNLINKED_PLACEHOLDER: &str = r"__\$[0-9a-fA-F]{34}\$__";

const ADDRESS_LENGTH: usize = 20;

/// Byte offset of a library placeholder in creation bytecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LinkOffset {
    pub start: usize,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: JsonAbi,
    /// Hex creation bytecode, possibly containing library placeholders.
    pub bytecode: String,
    #[serde(default)]
    pub link_references: LinkReferences,
}

impl Artifact {
    /// `<source>:<Name>`, the form explorers expect.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Returns the creation bytecode with every library placeholder replaced.
    pub fn link(&self, libraries: &Libraries) -> Result<Bytes, ArtifactError> {
        let mut code = self
            .bytecode
            .strip_prefix("0x")
            .unwrap_or(&self.bytecode)
            .to_owned();

        for (source, references) in &self.link_references {
            for (library, offsets) in references {
                let qualified = format!("{source}:{library}");
                let address = libraries
                    .get(&qualified)
                    .or_else(|| libraries.get(library))
                    .ok_or_else(|| ArtifactError::MissingLibrary {
                        contract: self.contract_name.clone(),
                        library: qualified.clone(),
                    })?;
                let address = hex::encode(address);
                for offset in offsets {
                    let start = offset.start * 2;
                    let end = start + offset.length * 2;
                    if offset.length != ADDRESS_LENGTH || end > code.len() {
                        return Err(ArtifactError::InvalidLinkReference {
                            contract: self.contract_name.clone(),
                            library: qualified,
                        });
                    }
                    code.replace_range(start..end, &address);
                }
            }
        }

        // Inline artifacts may carry placeholders without link references.
        for (library, address) in libraries {
            if library.contains(':') {
                code = code.replace(&placeholder(library), &hex::encode(address));
            }
        }

        let re = Regex::new(UNLINKED_PLACEHOLDER)?;
        if let Some(found) = re.find(&code) {
            return Err(ArtifactError::UnlinkedPlaceholder {
                contract: self.contract_name.clone(),
                placeholder: found.as_str().to_owned(),
            });
        }

        decode0x(&code).map(Into::into).map_err(|err| ArtifactError::InvalidBytecode {
            contract: self.contract_name.clone(),
            reason: err.to_string(),
        })
    }
}

/// Placeholder solc emits for a fully qualified library name.
pub fn placeholder(qualified_name: &str) -> String {
    let hash = hex::encode(keccak256(qualified_name.as_bytes()));
    format!("__${}$__", &hash[..34])
}

/// Compiler input and version recorded for a build.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub solc_version: String,
    pub solc_long_version: String,
    pub input: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct DebugFile {
    #[serde(rename = "buildInfo")]
    build_info: PathBuf,
}

/// Loads artifacts from disk, with optional preloaded entries.
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    root: Option<PathBuf>,
    preloaded: BTreeMap<String, Artifact>,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            preloaded: BTreeMap::new(),
        }
    }

    /// Registers an artifact under both its bare and fully qualified names.
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.preloaded
            .insert(artifact.fully_qualified_name(), artifact.clone());
        self.preloaded
            .insert(artifact.contract_name.clone(), artifact);
        self
    }

    /// Loads an artifact by bare (`Comptroller`) or fully qualified
    /// (`contracts/Comptroller.sol:Comptroller`) name.
    pub fn load(&self, name: &str) -> Result<Artifact, ArtifactError> {
        if let Some(artifact) = self.preloaded.get(name) {
            return Ok(artifact.clone());
        }
        let path = self.locate(name)?;
        debug!(@grey, "reading artifact {}", path.to_string_lossy());
        let artifact = serde_json::from_str(&fs::read_to_string(&path)?)?;
        Ok(artifact)
    }

    /// Loads the build info an artifact was compiled in.
    pub fn build_info(&self, name: &str) -> Result<BuildInfo, ArtifactError> {
        let path = self.locate(name)?;
        let dbg_path = path.with_extension("dbg.json");
        let dbg: DebugFile = serde_json::from_str(&fs::read_to_string(&dbg_path)?)?;
        let dir = dbg_path.parent().unwrap_or(Path::new("."));
        let build_info = fs::read_to_string(dir.join(dbg.build_info))?;
        Ok(serde_json::from_str(&build_info)?)
    }

    fn locate(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| ArtifactError::NotFound(name.to_owned()))?;

        if let Some((source, contract)) = name.rsplit_once(':') {
            let path = root.join(source).join(format!("{contract}.json"));
            return match path.is_file() {
                true => Ok(path),
                false => Err(ArtifactError::NotFound(name.to_owned())),
            };
        }

        let pattern = root.join("**").join(format!("{name}.json"));
        let mut matches = Vec::new();
        for entry in glob::glob(&pattern.to_string_lossy())? {
            let path = entry?;
            if !path.components().any(|c| c.as_os_str() == "build-info") {
                matches.push(path);
            }
        }
        match matches.len() {
            0 => Err(ArtifactError::NotFound(name.to_owned())),
            1 => Ok(matches.remove(0)),
            _ => Err(ArtifactError::Ambiguous {
                name: name.to_owned(),
                candidates: matches,
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid artifact search pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("{0}")]
    Glob(#[from] glob::GlobError),
    #[error("{0}")]
    Regex(#[from] regex::Error),

    #[error("no artifact found for {0}")]
    NotFound(String),
    #[error("artifact name {name} is ambiguous, use a fully qualified name: {candidates:?}")]
    Ambiguous {
        name: String,
        candidates: Vec<PathBuf>,
    },
    #[error("{contract} needs library {library}, but no address was given")]
    MissingLibrary { contract: String, library: String },
    #[error("{contract} has an invalid link reference for {library}")]
    InvalidLinkReference { contract: String, library: String },
    #[error("{contract} still contains unlinked library placeholder {placeholder}")]
    UnlinkedPlaceholder {
        contract: String,
        placeholder: String,
    },
    #[error("{contract} has invalid bytecode: {reason}")]
    InvalidBytecode { contract: String, reason: String },
}
