//! Recurring transaction types.

use chrono::NaiveDate;
use kontu_shared::types::{
    BusinessId, CostCenterId, LedgerAccountId, RecurringTransactionId, VoucherTypeId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Generation frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Every week on `day_of_week`.
    Weekly,
    /// Every month on `day_of_month`.
    Monthly,
    /// Every three months on `day_of_month`.
    Quarterly,
    /// Every year on (`month`, `day_of_month`).
    Yearly,
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {s}")),
        }
    }
}

/// One line of the voucher template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateItem {
    /// Account the line posts against.
    pub ledger_account_id: LedgerAccountId,
    /// Optional cost-center tag.
    pub cost_center_id: Option<CostCenterId>,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
}

/// A recurring transaction: schedule plus balanced template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTransaction {
    /// Unique identifier.
    pub id: RecurringTransactionId,
    /// Business this schedule belongs to.
    pub business_id: BusinessId,
    /// The voucher type generated vouchers take.
    pub voucher_type_id: VoucherTypeId,
    /// Display name, e.g. "Office rent".
    pub name: String,
    /// Generation frequency.
    pub frequency: Frequency,
    /// Day of month (1-31), clamped to shorter months. Monthly, quarterly
    /// and yearly schedules; defaults to the start date's day.
    pub day_of_month: Option<u32>,
    /// ISO day of week (1 = Monday .. 7 = Sunday) for weekly schedules;
    /// defaults to the start date's weekday.
    pub day_of_week: Option<u32>,
    /// Month (1-12) for yearly schedules; defaults to the start date's
    /// month.
    pub month: Option<u32>,
    /// First date generation may happen.
    pub start_date: NaiveDate,
    /// Last date generation may happen.
    pub end_date: Option<NaiveDate>,
    /// Maximum number of occurrences.
    pub occurrences: Option<i32>,
    /// How many vouchers have been generated so far.
    pub occurrences_generated: i32,
    /// Narration copied onto generated vouchers.
    pub narration: Option<String>,
    /// The balanced voucher template.
    pub template: Vec<TemplateItem>,
    /// Inactive schedules never come due.
    pub is_active: bool,
}
