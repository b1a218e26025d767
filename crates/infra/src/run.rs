//! Reconciliation runs over a [`LedgerSource`].

use rust_decimal::Decimal;
use thiserror::Error;

use backoffice_accounting::{
    Account, AccountKind, Movement, Reconciliation, TrailLine, audit_trail, reconcile,
};
use backoffice_core::{AccountId, DomainError};

use crate::ledger_source::{LedgerSource, SourceError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("account {id}: {source}")]
    Account {
        id: AccountId,
        #[source]
        source: DomainError,
    },
}

/// Reconciliation of one account plus the account metadata needed to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountReconciliation {
    pub account_name: String,
    pub account_kind: AccountKind,
    pub active: bool,
    pub reconciliation: Reconciliation,
}

impl AccountReconciliation {
    fn new(account: &Account, reconciliation: Reconciliation) -> Self {
        Self {
            account_name: account.name.clone(),
            account_kind: account.kind,
            active: account.active,
            reconciliation,
        }
    }
}

/// An account whose data could not be reconciled (e.g. a negative amount).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFailure {
    pub account_id: AccountId,
    pub account_name: String,
    pub error: DomainError,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub results: Vec<AccountReconciliation>,
    pub failures: Vec<AccountFailure>,
    /// Inactive accounts left out of the run.
    pub skipped: usize,
}

impl RunReport {
    /// Results whose difference exceeds `tolerance`.
    pub fn discrepancies(
        &self,
        tolerance: Decimal,
    ) -> impl Iterator<Item = &AccountReconciliation> {
        self.results
            .iter()
            .filter(move |r| !r.reconciliation.within(tolerance))
    }

    /// No failures and every result within `tolerance`.
    pub fn is_clean(&self, tolerance: Decimal) -> bool {
        self.failures.is_empty() && self.discrepancies(tolerance).next().is_none()
    }
}

/// Fetch one account with its movements and reconcile it.
pub fn reconcile_account<S>(source: &S, id: AccountId) -> Result<AccountReconciliation, RunError>
where
    S: LedgerSource + ?Sized,
{
    let Some(account) = source.account(id)? else {
        return Err(RunError::Account {
            id,
            source: DomainError::invalid_input("no such account"),
        });
    };
    let movements = source.movements(id)?;

    let reconciliation =
        reconcile(Some(&account), &movements).map_err(|source| RunError::Account { id, source })?;
    log_result(&account, &reconciliation);
    Ok(AccountReconciliation::new(&account, reconciliation))
}

/// Fetch one account with its movements and build the running-balance trail.
pub fn account_trail<S>(source: &S, id: AccountId) -> Result<Vec<TrailLine>, RunError>
where
    S: LedgerSource + ?Sized,
{
    let (account, movements) = fetch(source, id)?;
    audit_trail(account.as_ref(), &movements).map_err(|source| RunError::Account { id, source })
}

/// Reconcile every account of `source`.
///
/// Bad data in one account is recorded as a failure and the run moves on; a
/// source error aborts the whole run.
pub fn reconcile_all<S>(source: &S, options: RunOptions) -> Result<RunReport, SourceError>
where
    S: LedgerSource + ?Sized,
{
    let mut report = RunReport::default();

    for account in source.accounts()? {
        if !account.active && !options.include_inactive {
            report.skipped += 1;
            continue;
        }

        let movements = source.movements(account.id)?;
        match reconcile(Some(&account), &movements) {
            Ok(reconciliation) => {
                log_result(&account, &reconciliation);
                report
                    .results
                    .push(AccountReconciliation::new(&account, reconciliation));
            }
            Err(error) => {
                tracing::warn!(
                    account_id = %account.id,
                    account = %account.name,
                    "cannot reconcile account: {error}"
                );
                report.failures.push(AccountFailure {
                    account_id: account.id,
                    account_name: account.name.clone(),
                    error,
                });
            }
        }
    }

    let drifted = report.discrepancies(Decimal::ZERO).count();
    tracing::info!(
        reconciled = report.results.len(),
        drifted,
        failed = report.failures.len(),
        skipped = report.skipped,
        "reconciliation run finished"
    );

    Ok(report)
}

fn fetch<S>(source: &S, id: AccountId) -> Result<(Option<Account>, Vec<Movement>), SourceError>
where
    S: LedgerSource + ?Sized,
{
    let account = source.account(id)?;
    let movements = match account {
        Some(_) => source.movements(id)?,
        None => Vec::new(),
    };
    Ok((account, movements))
}

fn log_result(account: &Account, r: &Reconciliation) {
    if r.is_balanced() {
        tracing::debug!(account_id = %account.id, account = %account.name, "balance matches");
    } else {
        tracing::warn!(
            account_id = %account.id,
            account = %account.name,
            expected = %r.expected_balance,
            stored = %r.stored_balance,
            difference = %r.difference,
            "balance drift detected"
        );
    }
}
