//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `VoucherId` where an
//! `AccountGroupId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(BusinessId, "Unique identifier for a business (tenant).");
typed_id!(UserId, "Unique identifier for a user.");
typed_id!(AccountGroupId, "Unique identifier for a chart-of-accounts group.");
typed_id!(LedgerAccountId, "Unique identifier for a ledger account.");
typed_id!(CostCenterId, "Unique identifier for a cost center.");
typed_id!(FinancialYearId, "Unique identifier for a financial year.");
typed_id!(VoucherTypeId, "Unique identifier for a voucher type.");
typed_id!(VoucherId, "Unique identifier for a voucher.");
typed_id!(VoucherItemId, "Unique identifier for a voucher line item.");
typed_id!(JournalEntryId, "Unique identifier for a journal entry.");
typed_id!(PartyId, "Unique identifier for a party (customer/supplier).");
typed_id!(ReconciliationId, "Unique identifier for a bank reconciliation.");
typed_id!(
    ReconciliationItemId,
    "Unique identifier for a reconciliation line."
);
typed_id!(BudgetId, "Unique identifier for a budget.");
typed_id!(BudgetItemId, "Unique identifier for a budget line item.");
typed_id!(
    RecurringTransactionId,
    "Unique identifier for a recurring transaction."
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_new_is_unique() {
        let a = VoucherId::new();
        let b = VoucherId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_typed_id_roundtrip() {
        let id = LedgerAccountId::new();
        let parsed = LedgerAccountId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_typed_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = BusinessId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_v7_ids_are_time_ordered() {
        let a = JournalEntryId::new();
        let b = JournalEntryId::new();
        assert!(a.into_inner() <= b.into_inner());
    }
}
