//! Input boundary: where accounts and movements come from.
//!
//! The reconciliation checker never fetches data itself; callers resolve it
//! through a [`LedgerSource`] and hand the records over explicitly.

pub mod in_memory;
pub mod json_snapshot;
pub mod r#trait;

pub use in_memory::InMemoryLedgerSource;
pub use json_snapshot::{JsonSnapshotSource, LedgerSnapshot};
pub use r#trait::{LedgerSource, SourceError};
