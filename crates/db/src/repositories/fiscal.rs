//! Financial year repository.

use chrono::{NaiveDate, Utc};
use kontu_core::fiscal::{validate_no_overlap, year_for_date, FinancialYear};
use kontu_core::tenant::TenantContext;
use kontu_shared::types::FinancialYearId;
use kontu_shared::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use super::{convert, map_db_err};
use crate::entities::financial_years;

/// Input for creating a financial year.
#[derive(Debug, Clone)]
pub struct CreateYearInput {
    /// Display name, e.g. "FY 2025-26".
    pub name: String,
    /// First day of the year.
    pub start_date: NaiveDate,
    /// Last day of the year (inclusive).
    pub end_date: NaiveDate,
    /// Whether the new year becomes the current one.
    pub is_current: bool,
}

/// Repository for financial years.
#[derive(Debug, Clone)]
pub struct FiscalYearRepository {
    db: DatabaseConnection,
}

impl FiscalYearRepository {
    /// Creates a new fiscal year repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a business's financial years, newest first.
    pub async fn list(&self, ctx: &TenantContext) -> AppResult<Vec<FinancialYear>> {
        let rows = financial_years::Entity::find()
            .filter(financial_years::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        let mut years: Vec<FinancialYear> =
            rows.into_iter().map(convert::financial_year).collect();
        years.sort_by_key(|year| std::cmp::Reverse(year.start_date));
        Ok(years)
    }

    /// Fetches one financial year.
    pub async fn get(
        &self,
        ctx: &TenantContext,
        year_id: FinancialYearId,
    ) -> AppResult<FinancialYear> {
        let model = financial_years::Entity::find_by_id(year_id.into_inner())
            .filter(financial_years::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("financial year {year_id}")))?;
        Ok(convert::financial_year(model))
    }

    /// The year containing `date`, if any.
    pub async fn year_for_date(
        &self,
        ctx: &TenantContext,
        date: NaiveDate,
    ) -> AppResult<Option<FinancialYear>> {
        let years = self.list(ctx).await?;
        Ok(year_for_date(&years, date).cloned())
    }

    /// The business's current year.
    pub async fn current(&self, ctx: &TenantContext) -> AppResult<FinancialYear> {
        let model = financial_years::Entity::find()
            .filter(financial_years::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(financial_years::Column::IsCurrent.eq(true))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound("current financial year".to_string()))?;
        Ok(convert::financial_year(model))
    }

    /// Creates a financial year; date range must not overlap a sibling.
    /// Marking it current demotes the previous current year in the same
    /// transaction.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        input: CreateYearInput,
    ) -> AppResult<FinancialYear> {
        let existing = self.list(ctx).await?;
        validate_no_overlap(input.start_date, input.end_date, &existing, None)?;

        let now = Utc::now();
        let txn = self.db.begin().await.map_err(map_db_err)?;
        if input.is_current {
            self.demote_current(&txn, ctx).await?;
        }
        let model = financial_years::ActiveModel {
            id: Set(FinancialYearId::new().into_inner()),
            business_id: Set(ctx.business_id.into_inner()),
            name: Set(input.name),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            is_current: Set(input.is_current),
            is_locked: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let inserted = model.insert(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(year = %inserted.id, "created financial year");
        Ok(convert::financial_year(inserted))
    }

    /// Makes a year the business's current one (exactly one is current).
    pub async fn set_current(
        &self,
        ctx: &TenantContext,
        year_id: FinancialYearId,
    ) -> AppResult<FinancialYear> {
        let model = financial_years::Entity::find_by_id(year_id.into_inner())
            .filter(financial_years::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("financial year {year_id}")))?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        self.demote_current(&txn, ctx).await?;
        let mut active: financial_years::ActiveModel = model.into();
        active.is_current = Set(true);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(convert::financial_year(updated))
    }

    /// Locks or unlocks a year. A locked year rejects all voucher
    /// mutation until unlocked again.
    pub async fn set_locked(
        &self,
        ctx: &TenantContext,
        year_id: FinancialYearId,
        locked: bool,
    ) -> AppResult<FinancialYear> {
        let model = financial_years::Entity::find_by_id(year_id.into_inner())
            .filter(financial_years::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("financial year {year_id}")))?;

        let mut active: financial_years::ActiveModel = model.into();
        active.is_locked = Set(locked);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(map_db_err)?;

        tracing::info!(year = %year_id, locked, "changed financial year lock");
        Ok(convert::financial_year(updated))
    }

    async fn demote_current<C: sea_orm::ConnectionTrait>(
        &self,
        conn: &C,
        ctx: &TenantContext,
    ) -> AppResult<()> {
        financial_years::Entity::update_many()
            .col_expr(financial_years::Column::IsCurrent, Expr::value(false))
            .filter(financial_years::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(financial_years::Column::IsCurrent.eq(true))
            .exec(conn)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}
