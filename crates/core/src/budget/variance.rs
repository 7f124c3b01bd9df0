//! Budget variance calculations.

use kontu_shared::types::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Type of variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceType {
    /// Actual is under budget.
    Favorable,
    /// Actual is over budget.
    Unfavorable,
    /// No variance.
    None,
}

/// Budget vs actual variance for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetVariance {
    /// Budgeted amount.
    pub budget_amount: Decimal,
    /// Actual amount.
    pub actual_amount: Decimal,
    /// Variance amount (budget minus actual).
    pub variance_amount: Decimal,
    /// Variance as a percentage of the budget; zero when the budget is
    /// zero.
    pub variance_percentage: Decimal,
    /// Type of variance.
    pub variance_type: VarianceType,
}

impl BudgetVariance {
    /// Calculates variance = budget - actual, with the percentage against
    /// the budgeted figure.
    #[must_use]
    pub fn calculate(budget: Decimal, actual: Decimal) -> Self {
        let variance = budget - actual;
        let percentage = if budget.is_zero() {
            Decimal::ZERO
        } else {
            round_money(variance / budget * Decimal::ONE_HUNDRED)
        };

        let variance_type = if variance.is_zero() {
            VarianceType::None
        } else if variance > Decimal::ZERO {
            VarianceType::Favorable
        } else {
            VarianceType::Unfavorable
        };

        Self {
            budget_amount: budget,
            actual_amount: actual,
            variance_amount: variance,
            variance_percentage: percentage,
            variance_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_under_budget_is_favorable() {
        let variance = BudgetVariance::calculate(dec!(1000), dec!(800));
        assert_eq!(variance.variance_amount, dec!(200));
        assert_eq!(variance.variance_percentage, dec!(20.00));
        assert_eq!(variance.variance_type, VarianceType::Favorable);
    }

    #[test]
    fn test_over_budget_is_unfavorable() {
        let variance = BudgetVariance::calculate(dec!(1000), dec!(1200));
        assert_eq!(variance.variance_amount, dec!(-200));
        assert_eq!(variance.variance_percentage, dec!(-20.00));
        assert_eq!(variance.variance_type, VarianceType::Unfavorable);
    }

    #[test]
    fn test_on_budget() {
        let variance = BudgetVariance::calculate(dec!(500), dec!(500));
        assert_eq!(variance.variance_amount, dec!(0));
        assert_eq!(variance.variance_type, VarianceType::None);
    }

    #[test]
    fn test_zero_budget_has_no_percentage() {
        let variance = BudgetVariance::calculate(dec!(0), dec!(340));
        assert_eq!(variance.variance_amount, dec!(-340));
        assert_eq!(variance.variance_percentage, dec!(0));
        assert_eq!(variance.variance_type, VarianceType::Unfavorable);
    }
}
