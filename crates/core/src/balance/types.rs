//! Balance engine data types.

use chrono::NaiveDate;
use kontu_shared::types::{AccountGroupId, Balance, LedgerAccountId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::types::{AccountNature, LedgerAccount};

/// A ledger account joined with the classification its group provides.
///
/// The balance engine never walks the tree itself; callers resolve each
/// account's group nature (and gross-profit flag) up front.
#[derive(Debug, Clone)]
pub struct ClassifiedAccount {
    /// The ledger account.
    pub account: LedgerAccount,
    /// Nature inherited from the owning account group.
    pub nature: AccountNature,
    /// Gross-profit flag inherited from the owning account group.
    pub affects_gross_profit: bool,
}

/// One account row of a trial balance.
///
/// The closing balance sits in exactly one of the two columns; the other
/// is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account id.
    pub account_id: LedgerAccountId,
    /// Account code.
    pub code: Option<String>,
    /// Account name.
    pub name: String,
    /// Owning account group.
    pub account_group_id: AccountGroupId,
    /// Debit-side closing balance.
    pub debit: Decimal,
    /// Credit-side closing balance.
    pub credit: Decimal,
}

/// Group-level subtotal of a trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceGroupTotal {
    /// Account group id.
    pub account_group_id: AccountGroupId,
    /// Debit subtotal.
    pub debit: Decimal,
    /// Credit subtotal.
    pub credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// As-of date.
    pub as_of: NaiveDate,
    /// Account rows.
    pub rows: Vec<TrialBalanceRow>,
    /// Per-group subtotals.
    pub group_totals: Vec<TrialBalanceGroupTotal>,
    /// Grand total debit.
    pub total_debit: Decimal,
    /// Grand total credit.
    pub total_credit: Decimal,
    /// The books balance: grand debit equals grand credit.
    pub is_balanced: bool,
}

/// Aggregate totals for one account nature over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatureTotals {
    /// The nature aggregated.
    pub nature: AccountNature,
    /// Total debits.
    pub debit: Decimal,
    /// Total credits.
    pub credit: Decimal,
    /// Net balance, sign-resolved per the nature's normal side.
    pub net: Balance,
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthTotal {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Income total (credit minus debit over income accounts).
    pub income: Decimal,
    /// Expense total (debit minus credit over expense accounts).
    pub expense: Decimal,
}
