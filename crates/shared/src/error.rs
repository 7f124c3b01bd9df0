//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every business-rule failure in the engine maps onto one of these kinds.
/// None of them are transient: they represent bad input or a legitimate
/// accounting rule, and are never retried automatically.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input, nature mismatch, missing required field.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Voucher (or recurring template) debits and credits do not balance.
    #[error("Voucher is not balanced. Debit: {debit}, Credit: {credit}")]
    ImbalancedVoucher {
        /// Total debit amount.
        debit: rust_decimal::Decimal,
        /// Total credit amount.
        credit: rust_decimal::Decimal,
    },

    /// Voucher number collision within (business, type, financial year).
    #[error("Voucher number {0} already exists for this type and year")]
    DuplicateVoucherNumber(String),

    /// Mutation attempted against a locked financial year.
    #[error("Financial year is locked: {0}")]
    LockedPeriod(String),

    /// Delete blocked by existing children, transactions, or links.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced entity belongs to a different business than the context.
    #[error("Entity belongs to a different business")]
    CrossTenant,

    /// Journal entry already linked to another reconciliation.
    #[error("Journal entry {0} is already reconciled")]
    AlreadyReconciled(uuid::Uuid),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::ImbalancedVoucher { .. } => 400,
            Self::CrossTenant => 403,
            Self::NotFound(_) => 404,
            Self::DuplicateVoucherNumber(_)
            | Self::Conflict(_)
            | Self::AlreadyReconciled(_) => 409,
            Self::LockedPeriod(_) => 423,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ImbalancedVoucher { .. } => "IMBALANCED_VOUCHER",
            Self::DuplicateVoucherNumber(_) => "DUPLICATE_VOUCHER_NUMBER",
            Self::LockedPeriod(_) => "LOCKED_PERIOD",
            Self::Conflict(_) => "CONFLICT",
            Self::CrossTenant => "CROSS_TENANT",
            Self::AlreadyReconciled(_) => "ALREADY_RECONCILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(
            AppError::ImbalancedVoucher {
                debit: dec!(500),
                credit: dec!(400),
            }
            .status_code(),
            400
        );
        assert_eq!(AppError::CrossTenant.status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(
            AppError::DuplicateVoucherNumber(String::new()).status_code(),
            409
        );
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(
            AppError::AlreadyReconciled(uuid::Uuid::nil()).status_code(),
            409
        );
        assert_eq!(AppError::LockedPeriod(String::new()).status_code(), 423);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::ImbalancedVoucher {
                debit: dec!(1),
                credit: dec!(2),
            }
            .error_code(),
            "IMBALANCED_VOUCHER"
        );
        assert_eq!(
            AppError::DuplicateVoucherNumber(String::new()).error_code(),
            "DUPLICATE_VOUCHER_NUMBER"
        );
        assert_eq!(
            AppError::LockedPeriod(String::new()).error_code(),
            "LOCKED_PERIOD"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(AppError::CrossTenant.error_code(), "CROSS_TENANT");
        assert_eq!(
            AppError::AlreadyReconciled(uuid::Uuid::nil()).error_code(),
            "ALREADY_RECONCILED"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("name is required".into()).to_string(),
            "Validation error: name is required"
        );
        assert_eq!(
            AppError::ImbalancedVoucher {
                debit: dec!(500.00),
                credit: dec!(400.00),
            }
            .to_string(),
            "Voucher is not balanced. Debit: 500.00, Credit: 400.00"
        );
        assert_eq!(
            AppError::LockedPeriod("FY2025".into()).to_string(),
            "Financial year is locked: FY2025"
        );
        assert_eq!(
            AppError::CrossTenant.to_string(),
            "Entity belongs to a different business"
        );
    }
}
