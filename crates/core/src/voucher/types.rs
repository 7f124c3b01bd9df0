//! Voucher domain types.

use chrono::NaiveDate;
use kontu_shared::types::{
    BusinessId, CostCenterId, FinancialYearId, LedgerAccountId, PartyId, UserId, VoucherId,
    VoucherItemId, VoucherTypeId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The accounting nature of a voucher type.
///
/// Drives numbering prefixes and the receivable/payable direction used by
/// party aging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherNature {
    /// Money received.
    Receipt,
    /// Money paid out.
    Payment,
    /// Transfer between cash/bank accounts.
    Contra,
    /// General journal entry.
    Journal,
    /// Sales invoice.
    Sales,
    /// Purchase bill.
    Purchase,
    /// Debit note.
    DebitNote,
    /// Credit note.
    CreditNote,
}

impl VoucherNature {
    /// All eight natures.
    #[must_use]
    pub const fn all() -> [Self; 8] {
        [
            Self::Receipt,
            Self::Payment,
            Self::Contra,
            Self::Journal,
            Self::Sales,
            Self::Purchase,
            Self::DebitNote,
            Self::CreditNote,
        ]
    }
}

impl std::fmt::Display for VoucherNature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Receipt => "receipt",
            Self::Payment => "payment",
            Self::Contra => "contra",
            Self::Journal => "journal",
            Self::Sales => "sales",
            Self::Purchase => "purchase",
            Self::DebitNote => "debit_note",
            Self::CreditNote => "credit_note",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for VoucherNature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "receipt" => Ok(Self::Receipt),
            "payment" => Ok(Self::Payment),
            "contra" => Ok(Self::Contra),
            "journal" => Ok(Self::Journal),
            "sales" => Ok(Self::Sales),
            "purchase" => Ok(Self::Purchase),
            "debit_note" => Ok(Self::DebitNote),
            "credit_note" => Ok(Self::CreditNote),
            _ => Err(format!("Unknown voucher nature: {s}")),
        }
    }
}

/// A voucher type: numbering template plus nature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherType {
    /// Unique identifier.
    pub id: VoucherTypeId,
    /// Business this type belongs to.
    pub business_id: BusinessId,
    /// Display name, e.g. "Receipt Voucher".
    pub name: String,
    /// Short code, e.g. "RV".
    pub code: String,
    /// Accounting nature.
    pub nature: VoucherNature,
    /// Numbering prefix, e.g. "RV-".
    pub prefix: Option<String>,
    /// Whether voucher numbers are assigned automatically.
    pub auto_increment: bool,
    /// First sequence number for a fresh year.
    pub starting_number: i64,
    /// System types cannot be edited or deleted.
    pub is_system: bool,
}

/// A transaction document with balanced debit/credit line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    /// Unique identifier.
    pub id: VoucherId,
    /// Business this voucher belongs to.
    pub business_id: BusinessId,
    /// The voucher type.
    pub voucher_type_id: VoucherTypeId,
    /// The financial year the voucher date falls in.
    pub financial_year_id: FinancialYearId,
    /// Voucher number, unique per (business, type, year).
    pub voucher_number: String,
    /// Voucher date.
    pub date: NaiveDate,
    /// Optional party (customer/supplier).
    pub party_id: Option<PartyId>,
    /// Free-text narration.
    pub narration: Option<String>,
    /// External reference (invoice number, cheque number, ...).
    pub reference: Option<String>,
    /// Posted vouchers have journal entries; drafts do not.
    pub is_posted: bool,
    /// Total of the debit side (equals the credit side).
    pub total_amount: Decimal,
    /// User who created the voucher.
    pub created_by: UserId,
    /// User who last updated the voucher.
    pub updated_by: Option<UserId>,
}

/// One debit-or-credit line of a voucher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherItem {
    /// Unique identifier.
    pub id: VoucherItemId,
    /// Owning voucher.
    pub voucher_id: VoucherId,
    /// Account the line posts against.
    pub ledger_account_id: LedgerAccountId,
    /// Optional cost-center tag.
    pub cost_center_id: Option<CostCenterId>,
    /// Debit amount (zero when the line is a credit).
    pub debit_amount: Decimal,
    /// Credit amount (zero when the line is a debit).
    pub credit_amount: Decimal,
    /// Line narration, falls back to the voucher narration.
    pub narration: Option<String>,
    /// Line ordering within the voucher.
    pub sequence: i32,
}

/// Input for one voucher line.
///
/// On update, lines carrying an `id` are matched against existing rows;
/// id-less lines are inserted; existing rows without a match are deleted.
#[derive(Debug, Clone)]
pub struct VoucherItemInput {
    /// Existing item id, when editing.
    pub id: Option<VoucherItemId>,
    /// Account the line posts against.
    pub ledger_account_id: LedgerAccountId,
    /// Optional cost-center tag.
    pub cost_center_id: Option<CostCenterId>,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
    /// Line narration.
    pub narration: Option<String>,
}

/// Input for creating a voucher.
#[derive(Debug, Clone)]
pub struct CreateVoucherInput {
    /// Business the voucher belongs to.
    pub business_id: BusinessId,
    /// Voucher type.
    pub voucher_type_id: VoucherTypeId,
    /// Voucher date.
    pub date: NaiveDate,
    /// Optional party.
    pub party_id: Option<PartyId>,
    /// Narration.
    pub narration: Option<String>,
    /// External reference.
    pub reference: Option<String>,
    /// Manual voucher number; `None` for auto-numbered types.
    pub voucher_number: Option<String>,
    /// Whether to post immediately.
    pub is_posted: bool,
    /// The line items.
    pub items: Vec<VoucherItemInput>,
    /// Acting user.
    pub created_by: UserId,
}

/// Input for updating a voucher.
#[derive(Debug, Clone)]
pub struct UpdateVoucherInput {
    /// New voucher date.
    pub date: NaiveDate,
    /// New party.
    pub party_id: Option<PartyId>,
    /// New narration.
    pub narration: Option<String>,
    /// New external reference.
    pub reference: Option<String>,
    /// The full replacement item set (see [`VoucherItemInput`]).
    pub items: Vec<VoucherItemInput>,
    /// Acting user.
    pub updated_by: UserId,
}

/// Voucher totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherTotals {
    /// Total debit amount, rounded to 2 decimals.
    pub debit: Decimal,
    /// Total credit amount, rounded to 2 decimals.
    pub credit: Decimal,
}

impl VoucherTotals {
    /// Returns true when debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_voucher_nature_roundtrip() {
        for nature in VoucherNature::all() {
            assert_eq!(
                VoucherNature::from_str(&nature.to_string()).unwrap(),
                nature
            );
        }
        assert!(VoucherNature::from_str("invoice").is_err());
    }

    #[test]
    fn test_totals_balanced() {
        let totals = VoucherTotals {
            debit: dec!(100.00),
            credit: dec!(100.00),
        };
        assert!(totals.is_balanced());

        let totals = VoucherTotals {
            debit: dec!(100.00),
            credit: dec!(99.99),
        };
        assert!(!totals.is_balanced());
    }
}
