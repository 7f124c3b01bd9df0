//! Money primitives with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary amounts are `rust_decimal::Decimal`, rounded to 2 fraction
//! digits at comparison boundaries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the ledger a balance sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSide {
    /// Debit balance.
    Debit,
    /// Credit balance.
    Credit,
}

impl BalanceSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

impl std::fmt::Display for BalanceSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debit => write!(f, "debit"),
            Self::Credit => write!(f, "credit"),
        }
    }
}

impl std::str::FromStr for BalanceSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debit" | "dr" => Ok(Self::Debit),
            "credit" | "cr" => Ok(Self::Credit),
            _ => Err(format!("Unknown balance side: {s}")),
        }
    }
}

/// A resolved account balance: a non-negative amount on one ledger side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The absolute amount.
    pub amount: Decimal,
    /// The side the balance sits on.
    pub side: BalanceSide,
}

impl Balance {
    /// Creates a new balance.
    #[must_use]
    pub const fn new(amount: Decimal, side: BalanceSide) -> Self {
        Self { amount, side }
    }

    /// A zero balance on the given side.
    #[must_use]
    pub fn zero(side: BalanceSide) -> Self {
        Self {
            amount: Decimal::ZERO,
            side,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns the amount signed relative to the given side:
    /// positive when this balance sits on `side`, negative otherwise.
    #[must_use]
    pub fn signed_toward(&self, side: BalanceSide) -> Decimal {
        if self.side == side {
            self.amount
        } else {
            -self.amount
        }
    }
}

/// Rounds a monetary amount to 2 fraction digits.
///
/// Uses banker's rounding, matching the database `DECIMAL(18,2)` columns.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_balance_side_opposite() {
        assert_eq!(BalanceSide::Debit.opposite(), BalanceSide::Credit);
        assert_eq!(BalanceSide::Credit.opposite(), BalanceSide::Debit);
    }

    #[test]
    fn test_balance_side_roundtrip() {
        assert_eq!(
            BalanceSide::from_str(&BalanceSide::Debit.to_string()).unwrap(),
            BalanceSide::Debit
        );
        assert_eq!(BalanceSide::from_str("CR").unwrap(), BalanceSide::Credit);
        assert!(BalanceSide::from_str("sideways").is_err());
    }

    #[test]
    fn test_balance_signed_toward() {
        let b = Balance::new(dec!(150), BalanceSide::Debit);
        assert_eq!(b.signed_toward(BalanceSide::Debit), dec!(150));
        assert_eq!(b.signed_toward(BalanceSide::Credit), dec!(-150));
    }

    #[test]
    fn test_balance_zero() {
        let b = Balance::zero(BalanceSide::Credit);
        assert!(b.is_zero());
        assert_eq!(b.side, BalanceSide::Credit);
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.00));
        assert_eq!(round_money(dec!(10.015)), dec!(10.02));
        assert_eq!(round_money(dec!(10.9999)), dec!(11.00));
        assert_eq!(round_money(dec!(10)), dec!(10));
    }
}
