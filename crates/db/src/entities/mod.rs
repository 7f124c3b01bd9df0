//! `SeaORM` entity definitions for the bookkeeping schema.
//!
//! Enumerated columns are stored as lowercase strings and converted to the
//! core enums at the repository boundary; monetary columns are
//! `DECIMAL(18,2)`.

pub mod account_groups;
pub mod budget_items;
pub mod budgets;
pub mod businesses;
pub mod cost_centers;
pub mod financial_years;
pub mod journal_entries;
pub mod ledger_accounts;
pub mod parties;
pub mod reconciliation_items;
pub mod reconciliations;
pub mod recurring_template_items;
pub mod recurring_transactions;
pub mod voucher_items;
pub mod voucher_types;
pub mod vouchers;
