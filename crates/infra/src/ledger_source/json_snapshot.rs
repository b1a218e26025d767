//! Ledger source backed by a JSON export of the accounts and movements tables.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use backoffice_accounting::{Account, Movement};
use backoffice_core::{AccountId, Entity};

use super::in_memory::InMemoryLedgerSource;
use super::r#trait::{LedgerSource, SourceError};

/// On-disk snapshot layout.
///
/// ```json
/// { "accounts": [ { "id": "...", "name": "Caja 1", "kind": "cash_register",
///                   "opening_balance": "1000", "current_balance": "9500" } ],
///   "movements": [ { "id": "...", "account_id": "...", "kind": "income",
///                    "amount": "8000", "occurred_at": "2024-03-01T10:00:00Z" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub movements: Vec<Movement>,
}

/// Snapshot file loaded once into memory.
#[derive(Debug)]
pub struct JsonSnapshotSource {
    inner: InMemoryLedgerSource,
}

impl JsonSnapshotSource {
    /// Read and validate the snapshot at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Self::from_json_str(&raw)?;
        tracing::debug!("loaded ledger snapshot from {}", path.display());
        Ok(source)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SourceError> {
        let snapshot: LedgerSnapshot =
            serde_json::from_str(raw).map_err(|e| SourceError::Parse(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }

    /// Index a parsed snapshot.
    ///
    /// Account and movement ids must be unique: a repeated export row would
    /// otherwise be counted twice.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, SourceError> {
        ensure_unique(&snapshot.accounts, "account")?;
        ensure_unique(&snapshot.movements, "movement")?;

        let accounts = snapshot.accounts.len();
        let movements = snapshot.movements.len();

        let inner = InMemoryLedgerSource::new();
        for account in snapshot.accounts {
            inner.insert_account(account)?;
        }
        for movement in snapshot.movements {
            inner.record_movement(movement)?;
        }

        tracing::debug!(accounts, movements, "ledger snapshot indexed");
        Ok(Self { inner })
    }
}

fn ensure_unique<E>(records: &[E], what: &str) -> Result<(), SourceError>
where
    E: Entity,
    E::Id: core::fmt::Display,
{
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id()) {
            return Err(SourceError::Parse(format!("duplicate {what} id {}", record.id())));
        }
    }
    Ok(())
}

impl LedgerSource for JsonSnapshotSource {
    fn account(&self, id: AccountId) -> Result<Option<Account>, SourceError> {
        self.inner.account(id)
    }

    fn movements(&self, id: AccountId) -> Result<Vec<Movement>, SourceError> {
        self.inner.movements(id)
    }

    fn accounts(&self) -> Result<Vec<Account>, SourceError> {
        self.inner.accounts()
    }
}
