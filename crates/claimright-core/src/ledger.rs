use std::{collections::HashMap, sync::RwLock};

use uuid::Uuid;

use claimright_domain::LedgerEntryRef;

use crate::CoreError;

/// Read-only access to the externally owned ledger.
pub trait LedgerLookup: Send + Sync {
    fn ledger_entry(&self, id: Uuid) -> Result<Option<LedgerEntryRef>, CoreError>;
}

/// Ledger held in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: RwLock<HashMap<Uuid, LedgerEntryRef>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entry: LedgerEntryRef) -> Result<Uuid, CoreError> {
        let id = entry.id;
        self.entries
            .write()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".into()))?
            .insert(id, entry);
        Ok(id)
    }
}

impl LedgerLookup for MemoryLedger {
    fn ledger_entry(&self, id: Uuid) -> Result<Option<LedgerEntryRef>, CoreError> {
        Ok(self
            .entries
            .read()
            .map_err(|_| CoreError::Storage("ledger lock poisoned".into()))?
            .get(&id)
            .cloned())
    }
}
