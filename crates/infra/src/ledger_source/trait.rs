use std::path::PathBuf;

use thiserror::Error;

use backoffice_accounting::{Account, Movement};
use backoffice_core::{AccountId, MovementId};

/// Failures of the collaborator that supplies accounts and movements.
///
/// These never come from the reconciliation itself; they mean the data could
/// not be obtained at all.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("ledger source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read ledger snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed ledger snapshot: {0}")]
    Parse(String),

    #[error("movement {movement} references unknown account {account}")]
    UnknownAccount { movement: MovementId, account: AccountId },
}

/// Read-only access to persisted accounts and their movements.
pub trait LedgerSource: Send + Sync {
    /// Look up a single account.
    fn account(&self, id: AccountId) -> Result<Option<Account>, SourceError>;

    /// Complete movement history of an account, ordered by `occurred_at`
    /// ascending. Unknown accounts have no movements.
    fn movements(&self, id: AccountId) -> Result<Vec<Movement>, SourceError>;

    /// Every account, active or not, ordered by name then id.
    fn accounts(&self) -> Result<Vec<Account>, SourceError>;
}
