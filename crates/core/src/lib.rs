//! Core bookkeeping logic for Kontu.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. State is supplied by the caller (row slices, lookup
//! closures) and compound mutations come back as *write plans* that the
//! persistence layer applies inside one transaction.
//!
//! # Modules
//!
//! - `accounts` - Chart-of-accounts and cost-center trees
//! - `fiscal` - Financial years and period locking
//! - `voucher` - Voucher validation and the posting state machine
//! - `journal` - Journal entry generation
//! - `balance` - Balance and aggregation engine (trial balance, aging, ...)
//! - `party` - Customers and suppliers
//! - `reconcile` - Bank reconciliation
//! - `budget` - Budgets and variance analysis
//! - `recurring` - Recurring transaction scheduling
//! - `tenant` - Explicit tenant context
//! - `document` - Attachment reference keys

pub mod accounts;
pub mod balance;
pub mod budget;
pub mod document;
pub mod fiscal;
pub mod journal;
pub mod party;
pub mod reconcile;
pub mod recurring;
pub mod tenant;
pub mod voucher;

pub use kontu_shared::{AppError, AppResult};
