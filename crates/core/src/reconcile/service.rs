//! Reconciliation guards and balance recomputation.

use kontu_shared::types::round_money;
use kontu_shared::{AppError, AppResult};
use rust_decimal::Decimal;

use super::types::Reconciliation;
use crate::accounts::types::{AccountNature, LedgerAccount};
use crate::balance::engine::BalanceEngine;
use crate::journal::JournalEntry;

/// Default completion tolerance.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2); // 0.01

/// Reconciliation service for validation and recomputation.
pub struct ReconcileService;

impl ReconcileService {
    /// Only bank accounts can be reconciled against a statement.
    ///
    /// # Errors
    ///
    /// `Validation` for non-bank accounts.
    pub fn validate_account(account: &LedgerAccount) -> AppResult<()> {
        if !account.is_bank_account {
            return Err(AppError::Validation(format!(
                "account {} is not a bank account",
                account.name
            )));
        }
        Ok(())
    }

    /// Guards linking a journal entry to a reconciliation.
    ///
    /// `already_linked` is true when the entry is linked to *any*
    /// reconciliation, this one included: the uniqueness is global, not
    /// per reconciliation.
    ///
    /// # Errors
    ///
    /// `Validation` on a completed reconciliation or an entry of a
    /// different account, `CrossTenant` for a foreign entry,
    /// `AlreadyReconciled` when the entry is linked anywhere.
    pub fn validate_add_item(
        reconciliation: &Reconciliation,
        entry: &JournalEntry,
        already_linked: bool,
    ) -> AppResult<()> {
        if reconciliation.is_completed {
            return Err(AppError::Validation(
                "reconciliation is already completed".to_string(),
            ));
        }
        if entry.business_id != reconciliation.business_id {
            return Err(AppError::CrossTenant);
        }
        if entry.ledger_account_id != reconciliation.ledger_account_id {
            return Err(AppError::Validation(
                "journal entry does not belong to the reconciled account".to_string(),
            ));
        }
        if already_linked {
            return Err(AppError::AlreadyReconciled(entry.id.into_inner()));
        }
        Ok(())
    }

    /// Guards unlinking an entry.
    ///
    /// # Errors
    ///
    /// `Validation` on a completed reconciliation.
    pub fn validate_remove_item(reconciliation: &Reconciliation) -> AppResult<()> {
        if reconciliation.is_completed {
            return Err(AppError::Validation(
                "reconciliation is already completed".to_string(),
            ));
        }
        Ok(())
    }

    /// Recomputes the reconciled balance from the linked entries: the
    /// account's opening balance folded with the linked debit/credit sums,
    /// sign-resolved, expressed as a signed amount toward the account's
    /// normal side (so a bank overdraft comes out negative).
    #[must_use]
    pub fn reconciled_balance(
        account: &LedgerAccount,
        nature: AccountNature,
        linked_entries: &[JournalEntry],
    ) -> Decimal {
        let (mut debit, mut credit) = account.opening_totals();
        for entry in linked_entries {
            debit += entry.debit_amount;
            credit += entry.credit_amount;
        }
        BalanceEngine::resolve(nature, debit, credit).signed_toward(nature.normal_side())
    }

    /// Guards completion: the reconciled balance must sit within
    /// `tolerance` of the statement balance.
    ///
    /// # Errors
    ///
    /// `Validation` when already completed or out of tolerance.
    pub fn validate_complete(
        reconciliation: &Reconciliation,
        tolerance: Decimal,
    ) -> AppResult<()> {
        if reconciliation.is_completed {
            return Err(AppError::Validation(
                "reconciliation is already completed".to_string(),
            ));
        }
        let difference = round_money(
            (reconciliation.statement_balance - reconciliation.reconciled_balance).abs(),
        );
        if difference > tolerance {
            return Err(AppError::Validation(format!(
                "reconciled balance differs from statement by {difference}"
            )));
        }
        Ok(())
    }

    /// Guards reopening a completed reconciliation.
    ///
    /// # Errors
    ///
    /// `Validation` when not completed.
    pub fn validate_reopen(reconciliation: &Reconciliation) -> AppResult<()> {
        if !reconciliation.is_completed {
            return Err(AppError::Validation(
                "reconciliation is not completed".to_string(),
            ));
        }
        Ok(())
    }
}
