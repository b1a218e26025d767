use std::collections::HashMap;
use std::sync::RwLock;

use backoffice_accounting::{Account, Movement};
use backoffice_core::AccountId;

use super::r#trait::{LedgerSource, SourceError};

/// In-memory ledger source.
///
/// Intended for tests/dev and as the backing store of snapshot files.
#[derive(Debug, Default)]
pub struct InMemoryLedgerSource {
    accounts: RwLock<HashMap<AccountId, Account>>,
    movements: RwLock<HashMap<AccountId, Vec<Movement>>>,
}

impl InMemoryLedgerSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account. Returns the previous record, if any.
    pub fn insert_account(&self, account: Account) -> Result<Option<Account>, SourceError> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned("accounts"))?;
        Ok(accounts.insert(account.id, account))
    }

    /// Record a movement against an already inserted account.
    pub fn record_movement(&self, movement: Movement) -> Result<(), SourceError> {
        let known = self
            .accounts
            .read()
            .map_err(|_| poisoned("accounts"))?
            .contains_key(&movement.account_id);
        if !known {
            return Err(SourceError::UnknownAccount {
                movement: movement.id,
                account: movement.account_id,
            });
        }

        let mut movements = self.movements.write().map_err(|_| poisoned("movements"))?;
        movements.entry(movement.account_id).or_default().push(movement);
        Ok(())
    }
}

fn poisoned(what: &str) -> SourceError {
    SourceError::Unavailable(format!("{what} lock poisoned"))
}

impl LedgerSource for InMemoryLedgerSource {
    fn account(&self, id: AccountId) -> Result<Option<Account>, SourceError> {
        let accounts = self.accounts.read().map_err(|_| poisoned("accounts"))?;
        Ok(accounts.get(&id).cloned())
    }

    fn movements(&self, id: AccountId) -> Result<Vec<Movement>, SourceError> {
        let movements = self.movements.read().map_err(|_| poisoned("movements"))?;
        let mut list = movements.get(&id).cloned().unwrap_or_default();
        // Stable: movements posted with the same timestamp keep insertion order.
        list.sort_by_key(|m| m.occurred_at);
        Ok(list)
    }

    fn accounts(&self) -> Result<Vec<Account>, SourceError> {
        let accounts = self.accounts.read().map_err(|_| poisoned("accounts"))?;
        let mut list: Vec<Account> = accounts.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(list)
    }
}
