//! Parties: customers and suppliers.
//!
//! A party always owns exactly one backing ledger account in the Accounts
//! Receivable or Accounts Payable group; its balance and aging run through
//! that account and the party's vouchers.

use kontu_shared::types::{BusinessId, LedgerAccountId, PartyId};
use kontu_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance::aging::AgingSide;

/// Party classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    /// Customer (receivable side).
    Customer,
    /// Supplier (payable side).
    Supplier,
    /// Both customer and supplier.
    Both,
}

impl PartyKind {
    /// The aging sides relevant for this party.
    #[must_use]
    pub const fn aging_sides(self) -> &'static [AgingSide] {
        match self {
            Self::Customer => &[AgingSide::Receivable],
            Self::Supplier => &[AgingSide::Payable],
            Self::Both => &[AgingSide::Receivable, AgingSide::Payable],
        }
    }
}

impl std::fmt::Display for PartyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Supplier => write!(f, "supplier"),
            Self::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for PartyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "supplier" => Ok(Self::Supplier),
            "both" => Ok(Self::Both),
            _ => Err(format!("Unknown party kind: {s}")),
        }
    }
}

/// A customer or supplier with its backing ledger account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    /// Unique identifier.
    pub id: PartyId,
    /// Business this party belongs to.
    pub business_id: BusinessId,
    /// The backing ledger account (1:1, owned by the party).
    pub ledger_account_id: LedgerAccountId,
    /// Party name.
    pub name: String,
    /// Classification.
    pub kind: PartyKind,
    /// Optional credit limit for receivables.
    pub credit_limit: Option<Decimal>,
    /// Optional credit period in days.
    pub credit_period_days: Option<i32>,
}

impl Party {
    /// Returns true when a receivable balance would breach the party's
    /// credit limit. Parties without a limit never breach.
    #[must_use]
    pub fn exceeds_credit_limit(&self, outstanding: Decimal) -> bool {
        self.credit_limit
            .is_some_and(|limit| outstanding > limit)
    }

    /// Rejects deleting a party whose account still has journal entries.
    ///
    /// # Errors
    ///
    /// `Conflict` when entries exist against the backing account.
    pub fn validate_delete(&self, account_has_entries: bool) -> AppResult<()> {
        if account_has_entries {
            return Err(AppError::Conflict(format!(
                "party {} has transactions against its account",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn party(kind: PartyKind, credit_limit: Option<Decimal>) -> Party {
        Party {
            id: PartyId::new(),
            business_id: BusinessId::new(),
            ledger_account_id: LedgerAccountId::new(),
            name: "Acme Traders".to_string(),
            kind,
            credit_limit,
            credit_period_days: Some(30),
        }
    }

    #[test]
    fn test_aging_sides() {
        assert_eq!(
            PartyKind::Customer.aging_sides(),
            &[AgingSide::Receivable]
        );
        assert_eq!(PartyKind::Supplier.aging_sides(), &[AgingSide::Payable]);
        assert_eq!(PartyKind::Both.aging_sides().len(), 2);
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [PartyKind::Customer, PartyKind::Supplier, PartyKind::Both] {
            assert_eq!(PartyKind::from_str(&kind.to_string()).unwrap(), kind);
        }
    }

    #[test]
    fn test_credit_limit() {
        let limited = party(PartyKind::Customer, Some(dec!(1000)));
        assert!(!limited.exceeds_credit_limit(dec!(1000)));
        assert!(limited.exceeds_credit_limit(dec!(1000.01)));

        let unlimited = party(PartyKind::Customer, None);
        assert!(!unlimited.exceeds_credit_limit(dec!(1_000_000)));
    }

    #[test]
    fn test_delete_guard() {
        let p = party(PartyKind::Supplier, None);
        assert!(matches!(
            p.validate_delete(true),
            Err(AppError::Conflict(_))
        ));
        assert!(p.validate_delete(false).is_ok());
    }
}
