//! Bank reconciliation.
//!
//! A reconciliation matches a subset of a bank account's journal entries
//! against a statement balance. Each journal entry can be linked to at most
//! one reconciliation, ever; completion requires the reconciled balance to
//! sit within tolerance of the statement.

pub mod service;
pub mod types;

pub use service::ReconcileService;
pub use types::{Reconciliation, ReconciliationItem};
