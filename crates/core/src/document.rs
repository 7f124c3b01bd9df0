//! Attachment references.
//!
//! The engine never stores document bytes; it only emits stable storage
//! keys that an external blob store resolves. Targets are a closed set of
//! entity kinds, so membership is checked by the type system instead of
//! free-form type-name strings.

use kontu_shared::types::{
    BusinessId, LedgerAccountId, PartyId, ReconciliationId, VoucherId,
};
use serde::{Deserialize, Serialize};

/// The entity a document is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DocumentRef {
    /// Attached to a voucher (invoices, receipts, supporting papers).
    Voucher(VoucherId),
    /// Attached to a ledger account.
    LedgerAccount(LedgerAccountId),
    /// Attached to a party (contracts, KYC).
    Party(PartyId),
    /// Attached to a reconciliation (bank statements).
    Reconciliation(ReconciliationId),
}

impl DocumentRef {
    /// The storage key prefix for this reference, scoped under the owning
    /// business. The blob store appends the file name.
    #[must_use]
    pub fn storage_key(&self, business_id: BusinessId) -> String {
        match self {
            Self::Voucher(id) => format!("businesses/{business_id}/vouchers/{id}"),
            Self::LedgerAccount(id) => {
                format!("businesses/{business_id}/accounts/{id}")
            }
            Self::Party(id) => format!("businesses/{business_id}/parties/{id}"),
            Self::Reconciliation(id) => {
                format!("businesses/{business_id}/reconciliations/{id}")
            }
        }
    }
}
