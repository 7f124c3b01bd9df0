//! Recurring transactions.
//!
//! A recurring transaction is a schedule descriptor plus a balanced
//! voucher template. When due, the template materializes into a real,
//! immediately-posted voucher dated at the due date.

pub mod schedule;
pub mod service;
pub mod types;

pub use schedule::{is_due, next_due_date};
pub use service::RecurringService;
pub use types::{Frequency, RecurringTransaction, TemplateItem};
