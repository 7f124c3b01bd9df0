//! Financial year types and guards.
//!
//! A financial year is a date-range container. Locking a year makes every
//! voucher dated inside it immutable: create, update, delete, post and
//! unpost all fail with `LockedPeriod` until the year is unlocked again.

use chrono::NaiveDate;
use kontu_shared::types::{BusinessId, FinancialYearId};
use kontu_shared::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A business's accounting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialYear {
    /// Unique identifier.
    pub id: FinancialYearId,
    /// Business this year belongs to.
    pub business_id: BusinessId,
    /// Display name, e.g. "FY 2025-26".
    pub name: String,
    /// First day of the year.
    pub start_date: NaiveDate,
    /// Last day of the year (inclusive).
    pub end_date: NaiveDate,
    /// Exactly one year per business is current.
    pub is_current: bool,
    /// Locked years reject all voucher mutation.
    pub is_locked: bool,
}

impl FinancialYear {
    /// Returns true if the given date falls inside this year.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Rejects mutation while the year is locked.
    ///
    /// # Errors
    ///
    /// Returns `AppError::LockedPeriod` when `is_locked`.
    pub fn ensure_unlocked(&self) -> AppResult<()> {
        if self.is_locked {
            Err(AppError::LockedPeriod(self.name.clone()))
        } else {
            Ok(())
        }
    }

    /// Rejects a voucher date outside the year's range.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when the date is out of range.
    pub fn ensure_contains(&self, date: NaiveDate) -> AppResult<()> {
        if self.contains(date) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "date {date} is outside financial year {}",
                self.name
            )))
        }
    }
}

/// Finds the year containing `date`, if any.
#[must_use]
pub fn year_for_date(years: &[FinancialYear], date: NaiveDate) -> Option<&FinancialYear> {
    years.iter().find(|year| year.contains(date))
}

/// Validates that a new or edited year does not overlap any sibling year.
///
/// # Errors
///
/// `Validation` for an inverted range or an overlap with an existing year
/// (the edited year itself excluded via `exclude`).
pub fn validate_no_overlap(
    start_date: NaiveDate,
    end_date: NaiveDate,
    existing: &[FinancialYear],
    exclude: Option<FinancialYearId>,
) -> AppResult<()> {
    if end_date < start_date {
        return Err(AppError::Validation(
            "financial year end date is before its start date".to_string(),
        ));
    }
    for year in existing {
        if Some(year.id) == exclude {
            continue;
        }
        if start_date <= year.end_date && end_date >= year.start_date {
            return Err(AppError::Validation(format!(
                "date range overlaps financial year {}",
                year.name
            )));
        }
    }
    Ok(())
}
