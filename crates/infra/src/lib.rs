//! Infrastructure layer: ledger sources, configuration, reconciliation runs.

pub mod config;
pub mod ledger_source;
pub mod run;

pub use config::ReconcileConfig;
pub use ledger_source::{
    InMemoryLedgerSource, JsonSnapshotSource, LedgerSnapshot, LedgerSource, SourceError,
};
pub use run::{
    AccountFailure, AccountReconciliation, RunError, RunOptions, RunReport, account_trail,
    reconcile_account, reconcile_all,
};
