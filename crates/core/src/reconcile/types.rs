//! Reconciliation domain types.

use chrono::{DateTime, NaiveDate, Utc};
use kontu_shared::types::{
    BusinessId, JournalEntryId, LedgerAccountId, ReconciliationId, ReconciliationItemId, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bank statement reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Unique identifier.
    pub id: ReconciliationId,
    /// Business this reconciliation belongs to.
    pub business_id: BusinessId,
    /// The bank account being reconciled.
    pub ledger_account_id: LedgerAccountId,
    /// Statement date.
    pub statement_date: NaiveDate,
    /// Closing balance printed on the statement.
    pub statement_balance: Decimal,
    /// Book balance snapshot, recomputed from the balance engine at
    /// creation. A cached convenience value, never authoritative.
    pub account_balance: Decimal,
    /// Signed sum over the linked entries, recomputed on every item
    /// change.
    pub reconciled_balance: Decimal,
    /// Whether the reconciliation has been completed.
    pub is_completed: bool,
    /// User who completed it.
    pub completed_by: Option<UserId>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

/// One matched journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationItem {
    /// Unique identifier.
    pub id: ReconciliationItemId,
    /// Owning reconciliation.
    pub reconciliation_id: ReconciliationId,
    /// The matched journal entry. Unique across all reconciliations of
    /// the account.
    pub journal_entry_id: JournalEntryId,
}
