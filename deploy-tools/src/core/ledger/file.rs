// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use super::{check_name, DeploymentRecord, Ledger, LedgerError};

/// Ledger stored as one JSON document per name under `<root>/<network>/`.
#[derive(Debug, Clone)]
pub struct FileLedger {
    network: String,
    dir: PathBuf,
}

impl FileLedger {
    /// Opens the ledger for `network`, creating its directory if needed.
    pub fn open(root: impl AsRef<Path>, network: impl Into<String>) -> Result<Self, LedgerError> {
        let network = network.into();
        check_name(&network)?;
        let dir = root.as_ref().join(&network);
        fs::create_dir_all(&dir)?;
        Ok(Self { network, dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl Ledger for FileLedger {
    fn network(&self) -> &str {
        &self.network
    }

    fn get(&self, name: &str) -> Result<Option<DeploymentRecord>, LedgerError> {
        check_name(name)?;
        let json = match fs::read_to_string(self.path(name)) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn upsert(&mut self, name: &str, record: DeploymentRecord) -> Result<(), LedgerError> {
        check_name(name)?;
        let json = serde_json::to_string_pretty(&record)?;

        // Write to a sibling temp file, then rename over the record.
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(json.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(self.path(name)).map_err(|err| err.error)?;

        debug!(@grey, "saved deployment {name} to {}", self.path(name).to_string_lossy());
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>, LedgerError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    names.push(stem.to_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
