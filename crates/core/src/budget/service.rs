//! Budget item rules and actuals.

use chrono::NaiveDate;
use kontu_shared::types::{round_money, BudgetItemId, CostCenterId, LedgerAccountId};
use kontu_shared::{AppError, AppResult};
use rust_decimal::Decimal;

use super::types::{BudgetItem, DistributionMode, MONTHS_PER_YEAR};
use crate::balance::types::ClassifiedAccount;
use crate::journal::JournalEntry;

/// Budget service for distribution, uniqueness, and actuals.
pub struct BudgetService;

impl BudgetService {
    /// Applies the distribution mode to an item's amounts.
    ///
    /// Even mode writes annual/12 (rounded to cents) into every month and
    /// keeps the annual figure authoritative; the months are not forced to
    /// re-sum to the annual amount. Manual mode keeps the months as
    /// entered and derives the annual amount as their sum.
    #[must_use]
    pub fn apply_distribution(
        mode: DistributionMode,
        annual_amount: Decimal,
        monthly_amounts: [Decimal; MONTHS_PER_YEAR],
    ) -> ([Decimal; MONTHS_PER_YEAR], Decimal) {
        match mode {
            DistributionMode::Even => {
                let monthly = round_money(annual_amount / Decimal::from(MONTHS_PER_YEAR as u32));
                ([monthly; MONTHS_PER_YEAR], annual_amount)
            }
            DistributionMode::Manual => {
                let annual = monthly_amounts.iter().copied().sum();
                (monthly_amounts, annual)
            }
        }
    }

    /// Enforces (account, cost-center) uniqueness within a budget.
    ///
    /// # Errors
    ///
    /// `Conflict` when another item already budgets the same pair.
    pub fn validate_unique_item(
        existing_items: &[BudgetItem],
        ledger_account_id: LedgerAccountId,
        cost_center_id: Option<CostCenterId>,
        exclude: Option<BudgetItemId>,
    ) -> AppResult<()> {
        let duplicate = existing_items.iter().any(|item| {
            Some(item.id) != exclude
                && item.ledger_account_id == ledger_account_id
                && item.cost_center_id == cost_center_id
        });
        if duplicate {
            return Err(AppError::Conflict(
                "budget already has an item for this account and cost center".to_string(),
            ));
        }
        Ok(())
    }

    /// The actual amount posted against an item's account (and cost
    /// center, when the item is so restricted) over a window, signed
    /// toward the account's normal side.
    #[must_use]
    pub fn item_actual(
        item: &BudgetItem,
        classified: &ClassifiedAccount,
        entries: &[JournalEntry],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Decimal {
        let normal_side = classified.nature.normal_side();
        let mut debit = Decimal::ZERO;
        let mut credit = Decimal::ZERO;
        for entry in entries {
            if entry.ledger_account_id != item.ledger_account_id {
                continue;
            }
            if entry.date < from || entry.date > to {
                continue;
            }
            if let Some(cost_center_id) = item.cost_center_id {
                if entry.cost_center_id != Some(cost_center_id) {
                    continue;
                }
            }
            debit += entry.debit_amount;
            credit += entry.credit_amount;
        }
        crate::balance::engine::BalanceEngine::resolve(classified.nature, debit, credit)
            .signed_toward(normal_side)
    }
}
