//! Repository abstractions for data access.
//!
//! Every repository method takes an explicit [`TenantContext`] and filters
//! on its `business_id`; compound mutations run inside one database
//! transaction so a failure never leaves partial state behind.
//!
//! [`TenantContext`]: kontu_core::tenant::TenantContext

pub mod account;
pub mod bootstrap;
pub mod budget;
pub mod convert;
pub mod fiscal;
pub mod party;
pub mod reconciliation;
pub mod recurring;
pub mod report;
pub mod voucher;

pub use account::AccountRepository;
pub use bootstrap::BootstrapRepository;
pub use budget::BudgetRepository;
pub use fiscal::FiscalYearRepository;
pub use party::PartyRepository;
pub use reconciliation::ReconciliationRepository;
pub use recurring::RecurringRepository;
pub use report::ReportRepository;
pub use voucher::VoucherRepository;

use kontu_shared::AppError;
use sea_orm::DbErr;

/// Maps a SeaORM error into the application error taxonomy.
pub(crate) fn map_db_err(err: DbErr) -> AppError {
    AppError::Database(err.to_string())
}
