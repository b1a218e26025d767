//! `reconcile` command-line tool: balance reconciliation reports over a
//! ledger snapshot.

pub mod app;
pub mod cli;
pub mod dto;
pub mod render;

pub use app::{Outcome, execute, execute_with};
pub use cli::{Cli, Command, OutputFormat};
