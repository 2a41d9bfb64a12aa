// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::collections::BTreeMap;

use super::{check_name, DeploymentRecord, Ledger, LedgerError};

/// Ledger that lives for the duration of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    network: String,
    records: BTreeMap<String, DeploymentRecord>,
}

impl MemoryLedger {
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            records: BTreeMap::new(),
        }
    }
}

impl Ledger for MemoryLedger {
    fn network(&self) -> &str {
        &self.network
    }

    fn get(&self, name: &str) -> Result<Option<DeploymentRecord>, LedgerError> {
        Ok(self.records.get(name).cloned())
    }

    fn upsert(&mut self, name: &str, record: DeploymentRecord) -> Result<(), LedgerError> {
        check_name(name)?;
        self.records.insert(name.to_owned(), record);
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>, LedgerError> {
        Ok(self.records.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::Address;

    use super::*;
    use crate::core::ledger::tests::record;

    #[test]
    fn get_and_upsert() {
        let mut ledger = MemoryLedger::new("hardhat");
        assert_eq!(ledger.get("Token").unwrap(), None);

        let token = record(Address::repeat_byte(0x01));
        ledger.upsert("Token", token.clone()).unwrap();
        assert_eq!(ledger.get("Token").unwrap(), Some(token));
        assert_eq!(ledger.names().unwrap(), vec!["Token".to_owned()]);
        assert_eq!(ledger.network(), "hardhat");
    }
}
