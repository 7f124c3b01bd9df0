//! Budget repository and variance reporting.

use chrono::{NaiveDate, Utc};
use kontu_core::accounts::types::AccountNature;
use kontu_core::balance::types::ClassifiedAccount;
use kontu_core::budget::service::BudgetService;
use kontu_core::budget::types::{Budget, BudgetItem, DistributionMode, MONTHS_PER_YEAR};
use kontu_core::budget::variance::BudgetVariance;
use kontu_core::journal::JournalEntry;
use kontu_core::tenant::TenantContext;
use kontu_shared::types::{
    BudgetId, BudgetItemId, BusinessId, CostCenterId, FinancialYearId, LedgerAccountId,
};
use kontu_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{convert, map_db_err};
use crate::entities::{
    account_groups, budget_items, budgets, financial_years, journal_entries, ledger_accounts,
};

/// Input for adding or editing a budget item.
#[derive(Debug, Clone)]
pub struct BudgetItemInput {
    /// Existing item id when editing.
    pub item_id: Option<BudgetItemId>,
    /// The budgeted account.
    pub ledger_account_id: LedgerAccountId,
    /// Optional cost-center restriction.
    pub cost_center_id: Option<CostCenterId>,
    /// How the monthly amounts are derived.
    pub distribution: DistributionMode,
    /// Annual amount (authoritative in even mode).
    pub annual_amount: Decimal,
    /// Monthly amounts (authoritative in manual mode).
    pub monthly_amounts: [Decimal; MONTHS_PER_YEAR],
}

/// One row of a budget variance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetVarianceRow {
    /// The budget item.
    pub item_id: BudgetItemId,
    /// The budgeted account.
    pub ledger_account_id: LedgerAccountId,
    /// Account name.
    pub account_name: String,
    /// Optional cost-center restriction.
    pub cost_center_id: Option<CostCenterId>,
    /// Budget vs actual figures.
    pub variance: BudgetVariance,
}

/// Budget vs actual report for one budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetVarianceReport {
    /// The budget reported on.
    pub budget_id: BudgetId,
    /// Budget name.
    pub budget_name: String,
    /// Per-item rows.
    pub rows: Vec<BudgetVarianceRow>,
    /// Total budgeted amount.
    pub total_budget: Decimal,
    /// Total actual amount.
    pub total_actual: Decimal,
}

/// Repository for budgets.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a budget for a financial year.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        financial_year_id: FinancialYearId,
        name: String,
    ) -> AppResult<Budget> {
        let year_exists = financial_years::Entity::find_by_id(financial_year_id.into_inner())
            .filter(financial_years::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .is_some();
        if !year_exists {
            return Err(AppError::NotFound(format!(
                "financial year {financial_year_id}"
            )));
        }

        let now = Utc::now();
        let model = budgets::ActiveModel {
            id: Set(BudgetId::new().into_inner()),
            business_id: Set(ctx.business_id.into_inner()),
            financial_year_id: Set(financial_year_id.into_inner()),
            name: Set(name),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let inserted = model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(convert::budget(inserted))
    }

    /// Adds or edits a budget item. (account, cost center) is unique per
    /// budget; the distribution mode decides which side of the amounts is
    /// authoritative.
    pub async fn add_or_update_item(
        &self,
        ctx: &TenantContext,
        budget_id: BudgetId,
        input: BudgetItemInput,
    ) -> AppResult<BudgetItem> {
        self.get(ctx, budget_id).await?;
        let existing = self.items(ctx, budget_id).await?;
        BudgetService::validate_unique_item(
            &existing,
            input.ledger_account_id,
            input.cost_center_id,
            input.item_id,
        )?;

        let (months, annual) = BudgetService::apply_distribution(
            input.distribution,
            input.annual_amount,
            input.monthly_amounts,
        );

        let model = budget_items::ActiveModel {
            id: Set(input
                .item_id
                .unwrap_or_default()
                .into_inner()),
            budget_id: Set(budget_id.into_inner()),
            ledger_account_id: Set(input.ledger_account_id.into_inner()),
            cost_center_id: Set(input.cost_center_id.map(CostCenterId::into_inner)),
            month_01: Set(months[0]),
            month_02: Set(months[1]),
            month_03: Set(months[2]),
            month_04: Set(months[3]),
            month_05: Set(months[4]),
            month_06: Set(months[5]),
            month_07: Set(months[6]),
            month_08: Set(months[7]),
            month_09: Set(months[8]),
            month_10: Set(months[9]),
            month_11: Set(months[10]),
            month_12: Set(months[11]),
            annual_amount: Set(annual),
        };

        let saved = if input.item_id.is_some() {
            model.update(&self.db).await.map_err(map_db_err)?
        } else {
            model.insert(&self.db).await.map_err(map_db_err)?
        };
        Ok(convert::budget_item(saved))
    }

    /// Removes a budget item.
    pub async fn delete_item(
        &self,
        ctx: &TenantContext,
        budget_id: BudgetId,
        item_id: BudgetItemId,
    ) -> AppResult<()> {
        self.get(ctx, budget_id).await?;
        let deleted = budget_items::Entity::delete_many()
            .filter(budget_items::Column::Id.eq(item_id.into_inner()))
            .filter(budget_items::Column::BudgetId.eq(budget_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if deleted.rows_affected == 0 {
            return Err(AppError::NotFound(format!("budget item {item_id}")));
        }
        Ok(())
    }

    /// Fetches one budget.
    pub async fn get(&self, ctx: &TenantContext, budget_id: BudgetId) -> AppResult<Budget> {
        let model = budgets::Entity::find_by_id(budget_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("budget {budget_id}")))?;
        ctx.ensure_business(BusinessId::from_uuid(model.business_id))?;
        Ok(convert::budget(model))
    }

    /// The items of a budget.
    pub async fn items(
        &self,
        ctx: &TenantContext,
        budget_id: BudgetId,
    ) -> AppResult<Vec<BudgetItem>> {
        self.get(ctx, budget_id).await?;
        let rows = budget_items::Entity::find()
            .filter(budget_items::Column::BudgetId.eq(budget_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(convert::budget_item).collect())
    }

    /// Budget vs actual: actuals come from the journal ledger restricted
    /// to each item's account (and cost center) over the financial year
    /// up to `as_of` (defaults to the year end).
    pub async fn variance_report(
        &self,
        ctx: &TenantContext,
        budget_id: BudgetId,
        as_of: Option<NaiveDate>,
    ) -> AppResult<BudgetVarianceReport> {
        let budget = self.get(ctx, budget_id).await?;
        let year = financial_years::Entity::find_by_id(budget.financial_year_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::Internal("budget year missing".to_string()))?;
        let year = convert::financial_year(year);
        let to = as_of.map_or(year.end_date, |date| date.min(year.end_date));

        let items = self.items(ctx, budget_id).await?;
        let mut rows = Vec::with_capacity(items.len());
        let mut total_budget = Decimal::ZERO;
        let mut total_actual = Decimal::ZERO;

        for item in items {
            let classified = self.classified_account(ctx, item.ledger_account_id).await?;
            let entries = self
                .account_entries(ctx, item.ledger_account_id, year.start_date, to)
                .await?;
            let actual =
                BudgetService::item_actual(&item, &classified, &entries, year.start_date, to);
            let variance = BudgetVariance::calculate(item.annual_amount, actual);

            total_budget += item.annual_amount;
            total_actual += actual;
            rows.push(BudgetVarianceRow {
                item_id: item.id,
                ledger_account_id: item.ledger_account_id,
                account_name: classified.account.name.clone(),
                cost_center_id: item.cost_center_id,
                variance,
            });
        }

        Ok(BudgetVarianceReport {
            budget_id,
            budget_name: budget.name,
            rows,
            total_budget,
            total_actual,
        })
    }

    async fn classified_account(
        &self,
        ctx: &TenantContext,
        account_id: LedgerAccountId,
    ) -> AppResult<ClassifiedAccount> {
        let model = ledger_accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("ledger account {account_id}")))?;
        ctx.ensure_business(BusinessId::from_uuid(model.business_id))?;
        let group = account_groups::Entity::find_by_id(model.account_group_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::Internal("account group missing".to_string()))?;
        Ok(ClassifiedAccount {
            account: convert::ledger_account(model)?,
            nature: AccountNature::from_str(&group.nature)
                .map_err(|err| AppError::Internal(format!("corrupt nature column: {err}")))?,
            affects_gross_profit: group.affects_gross_profit,
        })
    }

    async fn account_entries(
        &self,
        ctx: &TenantContext,
        account_id: LedgerAccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<JournalEntry>> {
        let rows = journal_entries::Entity::find()
            .filter(journal_entries::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(journal_entries::Column::LedgerAccountId.eq(account_id.into_inner()))
            .filter(journal_entries::Column::Date.gte(from))
            .filter(journal_entries::Column::Date.lte(to))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(convert::journal_entry).collect())
    }
}
