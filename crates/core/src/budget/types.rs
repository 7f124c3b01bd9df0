//! Budget data types.

use kontu_shared::types::{
    BudgetId, BudgetItemId, BusinessId, CostCenterId, FinancialYearId, LedgerAccountId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of monthly slots per budget item.
pub const MONTHS_PER_YEAR: usize = 12;

/// How an item's monthly amounts relate to its annual amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    /// Annual amount divided evenly across the twelve months.
    Even,
    /// Months entered by hand; the annual amount is their sum.
    Manual,
}

impl std::fmt::Display for DistributionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Even => write!(f, "even"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for DistributionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "even" => Ok(Self::Even),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown distribution mode: {s}")),
        }
    }
}

/// A budget for one financial year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier.
    pub id: BudgetId,
    /// Business this budget belongs to.
    pub business_id: BusinessId,
    /// The financial year budgeted.
    pub financial_year_id: FinancialYearId,
    /// Budget name.
    pub name: String,
    /// Whether the budget is active.
    pub is_active: bool,
}

/// One budget line: an (account, optional cost-center) pair with twelve
/// monthly amounts and the derived/driving annual amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetItem {
    /// Unique identifier.
    pub id: BudgetItemId,
    /// Owning budget.
    pub budget_id: BudgetId,
    /// The budgeted account.
    pub ledger_account_id: LedgerAccountId,
    /// Optional cost-center restriction.
    pub cost_center_id: Option<CostCenterId>,
    /// The twelve monthly amounts, first financial-year month first.
    pub monthly_amounts: [Decimal; MONTHS_PER_YEAR],
    /// Annual amount.
    pub annual_amount: Decimal,
}

impl BudgetItem {
    /// Sum of the monthly amounts.
    #[must_use]
    pub fn months_total(&self) -> Decimal {
        self.monthly_amounts.iter().copied().sum()
    }
}
