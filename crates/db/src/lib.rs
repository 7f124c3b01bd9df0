//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the bookkeeping schema
//! - Repository abstractions that enforce tenant scoping and wrap every
//!   compound mutation in a database transaction
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, BootstrapRepository, BudgetRepository, FiscalYearRepository,
    PartyRepository, ReconciliationRepository, RecurringRepository, ReportRepository,
    VoucherRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
