//! Business rule validation for voucher line items.

use kontu_shared::types::round_money;
use kontu_shared::{AppError, AppResult};
use rust_decimal::Decimal;

use super::types::{VoucherItemInput, VoucherTotals};

/// Validates a voucher's line items and returns the rounded totals.
///
/// Rules:
/// - at least one line item;
/// - every line is either a debit or a credit: exactly one side positive,
///   the other zero;
/// - negative amounts are rejected;
/// - the debit and credit sums, rounded to 2 decimals, must be equal.
///
/// # Errors
///
/// `Validation` for malformed lines, `ImbalancedVoucher` when the rounded
/// sums differ.
pub fn validate_items(items: &[VoucherItemInput]) -> AppResult<VoucherTotals> {
    if items.is_empty() {
        return Err(AppError::Validation(
            "voucher must have at least one line item".to_string(),
        ));
    }

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    for (index, item) in items.iter().enumerate() {
        if item.debit_amount < Decimal::ZERO || item.credit_amount < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "line {}: amounts cannot be negative",
                index + 1
            )));
        }
        let has_debit = item.debit_amount > Decimal::ZERO;
        let has_credit = item.credit_amount > Decimal::ZERO;
        if has_debit == has_credit {
            return Err(AppError::Validation(format!(
                "line {}: exactly one of debit or credit must be positive",
                index + 1
            )));
        }

        total_debit += item.debit_amount;
        total_credit += item.credit_amount;
    }

    let totals = VoucherTotals {
        debit: round_money(total_debit),
        credit: round_money(total_credit),
    };

    if !totals.is_balanced() {
        return Err(AppError::ImbalancedVoucher {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}
