//! Accounting module (cash registers, bank accounts, balance reconciliation).
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod account;
pub mod movement;
pub mod reconcile;

pub use account::{Account, AccountKind};
pub use movement::{Movement, MovementKind};
pub use reconcile::{Reconciliation, TrailLine, audit_trail, reconcile};
