//! Financial years and period locking.

pub mod year;

pub use year::{validate_no_overlap, year_for_date, FinancialYear};
