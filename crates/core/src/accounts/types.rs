//! Account domain types.

use kontu_shared::types::{
    AccountGroupId, BalanceSide, BusinessId, CostCenterId, LedgerAccountId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The accounting classification of an account group.
///
/// Nature determines the balance-sign convention for every ledger account
/// in the subtree and must match between parent and child groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountNature {
    /// Assets (debit-normal).
    Assets,
    /// Liabilities (credit-normal).
    Liabilities,
    /// Income (credit-normal).
    Income,
    /// Expense (debit-normal).
    Expense,
    /// Equity (credit-normal).
    Equity,
}

impl AccountNature {
    /// The ledger side a positive balance of this nature sits on.
    ///
    /// Assets and expense accounts are debit-normal; liabilities, income
    /// and equity accounts are credit-normal.
    #[must_use]
    pub const fn normal_side(self) -> BalanceSide {
        match self {
            Self::Assets | Self::Expense => BalanceSide::Debit,
            Self::Liabilities | Self::Income | Self::Equity => BalanceSide::Credit,
        }
    }

    /// All five natures, in report order.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Assets,
            Self::Liabilities,
            Self::Income,
            Self::Expense,
            Self::Equity,
        ]
    }
}

impl std::fmt::Display for AccountNature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assets => write!(f, "assets"),
            Self::Liabilities => write!(f, "liabilities"),
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Equity => write!(f, "equity"),
        }
    }
}

impl std::str::FromStr for AccountNature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assets" => Ok(Self::Assets),
            "liabilities" => Ok(Self::Liabilities),
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "equity" => Ok(Self::Equity),
            _ => Err(format!("Unknown account nature: {s}")),
        }
    }
}

/// A node in the chart-of-accounts tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountGroup {
    /// Unique identifier.
    pub id: AccountGroupId,
    /// Business this group belongs to.
    pub business_id: BusinessId,
    /// Parent group; `None` for the five nature roots.
    pub parent_id: Option<AccountGroupId>,
    /// Group name.
    pub name: String,
    /// Accounting nature, equal across the whole subtree.
    pub nature: AccountNature,
    /// Whether accounts under this group feed the gross-profit figure.
    pub affects_gross_profit: bool,
    /// Sibling ordering.
    pub sequence: i32,
    /// System groups cannot be edited or deleted.
    pub is_system: bool,
}

/// A postable ledger account, leaf of the account tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Unique identifier.
    pub id: LedgerAccountId,
    /// Business this account belongs to.
    pub business_id: BusinessId,
    /// The group this account hangs under.
    pub account_group_id: AccountGroupId,
    /// Account code, unique per business when present.
    pub code: Option<String>,
    /// Account name.
    pub name: String,
    /// Opening balance carried into the first financial year.
    pub opening_balance: Decimal,
    /// The side the opening balance sits on.
    pub opening_balance_side: BalanceSide,
    /// Bank accounts are reconcilable against statements.
    pub is_bank_account: bool,
    /// Cash accounts feed the cash-flow views.
    pub is_cash_account: bool,
    /// System accounts cannot be edited or deleted.
    pub is_system: bool,
    /// Inactive accounts reject new postings.
    pub is_active: bool,
}

impl LedgerAccount {
    /// The opening balance expressed as (debit, credit) totals.
    #[must_use]
    pub fn opening_totals(&self) -> (Decimal, Decimal) {
        match self.opening_balance_side {
            BalanceSide::Debit => (self.opening_balance, Decimal::ZERO),
            BalanceSide::Credit => (Decimal::ZERO, self.opening_balance),
        }
    }
}

/// A node in the cost-center tree. Pure tagging dimension, no nature rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCenter {
    /// Unique identifier.
    pub id: CostCenterId,
    /// Business this cost center belongs to.
    pub business_id: BusinessId,
    /// Parent cost center.
    pub parent_id: Option<CostCenterId>,
    /// Cost center name.
    pub name: String,
    /// Code, unique per business.
    pub code: String,
    /// Inactive cost centers reject new postings.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_normal_side() {
        assert_eq!(AccountNature::Assets.normal_side(), BalanceSide::Debit);
        assert_eq!(AccountNature::Expense.normal_side(), BalanceSide::Debit);
        assert_eq!(AccountNature::Liabilities.normal_side(), BalanceSide::Credit);
        assert_eq!(AccountNature::Income.normal_side(), BalanceSide::Credit);
        assert_eq!(AccountNature::Equity.normal_side(), BalanceSide::Credit);
    }

    #[test]
    fn test_nature_roundtrip() {
        for nature in AccountNature::all() {
            assert_eq!(
                AccountNature::from_str(&nature.to_string()).unwrap(),
                nature
            );
        }
        assert!(AccountNature::from_str("revenue").is_err());
    }

    #[test]
    fn test_opening_totals() {
        let mut account = LedgerAccount {
            id: LedgerAccountId::new(),
            business_id: BusinessId::new(),
            account_group_id: AccountGroupId::new(),
            code: None,
            name: "Cash".to_string(),
            opening_balance: dec!(250),
            opening_balance_side: BalanceSide::Debit,
            is_bank_account: false,
            is_cash_account: true,
            is_system: false,
            is_active: true,
        };
        assert_eq!(account.opening_totals(), (dec!(250), dec!(0)));

        account.opening_balance_side = BalanceSide::Credit;
        assert_eq!(account.opening_totals(), (dec!(0), dec!(250)));
    }
}
