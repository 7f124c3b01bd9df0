//! Journal entry generation.
//!
//! The journal ledger is the append-only source of truth for every balance
//! computation. Entries are generated 1:1 from the items of a posted
//! voucher and are never mutated independently: whenever a posted voucher's
//! items change, all of its entries are deleted and re-emitted.

use chrono::NaiveDate;
use kontu_shared::types::{
    BusinessId, CostCenterId, FinancialYearId, JournalEntryId, LedgerAccountId, VoucherId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::voucher::types::{Voucher, VoucherItem};

/// One immutable debit-or-credit row against a single ledger account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Business this entry belongs to.
    pub business_id: BusinessId,
    /// The voucher this entry was generated from.
    pub voucher_id: VoucherId,
    /// The account this entry posts against.
    pub ledger_account_id: LedgerAccountId,
    /// Optional cost-center tag, copied from the voucher item.
    pub cost_center_id: Option<CostCenterId>,
    /// The financial year of the voucher.
    pub financial_year_id: FinancialYearId,
    /// Entry date (the voucher date).
    pub date: NaiveDate,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
    /// Narration, from the item or falling back to the voucher.
    pub narration: Option<String>,
}

impl JournalEntry {
    /// The entry's net effect as debit minus credit.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit_amount - self.credit_amount
    }
}

/// Generates the journal entries for a posted voucher: one entry per item,
/// copying account, cost center, amounts, and the voucher's date, year and
/// business.
///
/// The mapping is deterministic: re-running it on an unchanged voucher
/// yields the same accounts, amounts, dates and count (entry ids are fresh
/// each time, since regeneration replaces the previous rows wholesale).
#[must_use]
pub fn generate_entries(voucher: &Voucher, items: &[VoucherItem]) -> Vec<JournalEntry> {
    items
        .iter()
        .map(|item| JournalEntry {
            id: JournalEntryId::new(),
            business_id: voucher.business_id,
            voucher_id: voucher.id,
            ledger_account_id: item.ledger_account_id,
            cost_center_id: item.cost_center_id,
            financial_year_id: voucher.financial_year_id,
            date: voucher.date,
            debit_amount: item.debit_amount,
            credit_amount: item.credit_amount,
            narration: item.narration.clone().or_else(|| voucher.narration.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kontu_shared::types::{PartyId, UserId, VoucherItemId, VoucherTypeId};
    use rust_decimal_macros::dec;

    fn sample_voucher() -> (Voucher, Vec<VoucherItem>) {
        let voucher = Voucher {
            id: VoucherId::new(),
            business_id: BusinessId::new(),
            voucher_type_id: VoucherTypeId::new(),
            financial_year_id: FinancialYearId::new(),
            voucher_number: "RV-0001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            party_id: None::<PartyId>,
            narration: Some("Cash sale".to_string()),
            reference: None,
            is_posted: true,
            total_amount: dec!(500),
            created_by: UserId::new(),
            updated_by: None,
        };
        let items = vec![
            VoucherItem {
                id: VoucherItemId::new(),
                voucher_id: voucher.id,
                ledger_account_id: LedgerAccountId::new(),
                cost_center_id: Some(CostCenterId::new()),
                debit_amount: dec!(500),
                credit_amount: dec!(0),
                narration: Some("To cash".to_string()),
                sequence: 1,
            },
            VoucherItem {
                id: VoucherItemId::new(),
                voucher_id: voucher.id,
                ledger_account_id: LedgerAccountId::new(),
                cost_center_id: None,
                debit_amount: dec!(0),
                credit_amount: dec!(500),
                narration: None,
                sequence: 2,
            },
        ];
        (voucher, items)
    }

    #[test]
    fn test_one_entry_per_item() {
        let (voucher, items) = sample_voucher();
        let entries = generate_entries(&voucher, &items);

        assert_eq!(entries.len(), 2);
        for (entry, item) in entries.iter().zip(&items) {
            assert_eq!(entry.voucher_id, voucher.id);
            assert_eq!(entry.business_id, voucher.business_id);
            assert_eq!(entry.financial_year_id, voucher.financial_year_id);
            assert_eq!(entry.date, voucher.date);
            assert_eq!(entry.ledger_account_id, item.ledger_account_id);
            assert_eq!(entry.cost_center_id, item.cost_center_id);
            assert_eq!(entry.debit_amount, item.debit_amount);
            assert_eq!(entry.credit_amount, item.credit_amount);
        }
    }

    #[test]
    fn test_narration_falls_back_to_voucher() {
        let (voucher, items) = sample_voucher();
        let entries = generate_entries(&voucher, &items);
        assert_eq!(entries[0].narration.as_deref(), Some("To cash"));
        assert_eq!(entries[1].narration.as_deref(), Some("Cash sale"));
    }

    #[test]
    fn test_regeneration_is_idempotent() {
        let (voucher, items) = sample_voucher();
        let first = generate_entries(&voucher, &items);
        let second = generate_entries(&voucher, &items);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.ledger_account_id, b.ledger_account_id);
            assert_eq!(a.cost_center_id, b.cost_center_id);
            assert_eq!(a.debit_amount, b.debit_amount);
            assert_eq!(a.credit_amount, b.credit_amount);
            assert_eq!(a.date, b.date);
            assert_eq!(a.narration, b.narration);
        }
    }

    #[test]
    fn test_entries_balance() {
        let (voucher, items) = sample_voucher();
        let entries = generate_entries(&voucher, &items);
        let net: Decimal = entries.iter().map(JournalEntry::signed_amount).sum();
        assert_eq!(net, Decimal::ZERO);
    }
}
