//! Recurring transaction repository.
//!
//! Generation is synchronous: callers invoke it (or the batch
//! `process_due`) explicitly; there is no in-process scheduler.

use chrono::{NaiveDate, Utc};
use kontu_core::recurring::schedule;
use kontu_core::recurring::service::RecurringService;
use kontu_core::recurring::types::{Frequency, RecurringTransaction, TemplateItem};
use kontu_core::tenant::TenantContext;
use kontu_core::voucher::types::{Voucher, VoucherItemInput};
use kontu_shared::types::{BusinessId, CostCenterId, RecurringTransactionId, VoucherTypeId};
use kontu_shared::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};

use super::voucher::{lookup, VoucherRepository};
use super::{convert, map_db_err};
use crate::entities::{recurring_template_items, recurring_transactions};

/// Input for creating a recurring transaction.
#[derive(Debug, Clone)]
pub struct CreateRecurringInput {
    /// The voucher type generated vouchers take.
    pub voucher_type_id: VoucherTypeId,
    /// Display name.
    pub name: String,
    /// Generation frequency.
    pub frequency: Frequency,
    /// Day of month (1-31) for monthly/quarterly/yearly schedules.
    pub day_of_month: Option<u32>,
    /// ISO day of week (1-7) for weekly schedules.
    pub day_of_week: Option<u32>,
    /// Month (1-12) for yearly schedules.
    pub month: Option<u32>,
    /// First date generation may happen.
    pub start_date: NaiveDate,
    /// Last date generation may happen.
    pub end_date: Option<NaiveDate>,
    /// Maximum number of occurrences.
    pub occurrences: Option<i32>,
    /// Narration copied onto generated vouchers.
    pub narration: Option<String>,
    /// The balanced voucher template.
    pub template: Vec<TemplateItem>,
}

/// Outcome of a batch generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessSummary {
    /// Vouchers generated.
    pub generated: usize,
    /// Schedules that failed; the run continues past each failure.
    pub failed: usize,
}

/// Repository for recurring transactions.
#[derive(Debug, Clone)]
pub struct RecurringRepository {
    db: DatabaseConnection,
}

impl RecurringRepository {
    /// Creates a new recurring transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a recurring transaction with its template, in one
    /// transaction. The template must balance.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        input: CreateRecurringInput,
    ) -> AppResult<RecurringTransaction> {
        RecurringService::validate_template(&input.template)?;
        let vouchers = VoucherRepository::new(self.db.clone());
        vouchers.load_voucher_type(ctx, input.voucher_type_id).await?;

        let now = Utc::now();
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let id = RecurringTransactionId::new();
        let model = recurring_transactions::ActiveModel {
            id: Set(id.into_inner()),
            business_id: Set(ctx.business_id.into_inner()),
            voucher_type_id: Set(input.voucher_type_id.into_inner()),
            name: Set(input.name),
            frequency: Set(input.frequency.to_string()),
            day_of_month: Set(input.day_of_month.map(|day| day as i32)),
            day_of_week: Set(input.day_of_week.map(|day| day as i32)),
            month: Set(input.month.map(|month| month as i32)),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            occurrences: Set(input.occurrences),
            occurrences_generated: Set(0),
            narration: Set(input.narration),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        model.insert(&txn).await.map_err(map_db_err)?;

        for (index, item) in input.template.iter().enumerate() {
            let row = recurring_template_items::ActiveModel {
                id: Set(uuid::Uuid::now_v7()),
                recurring_transaction_id: Set(id.into_inner()),
                ledger_account_id: Set(item.ledger_account_id.into_inner()),
                cost_center_id: Set(item.cost_center_id.map(CostCenterId::into_inner)),
                debit_amount: Set(item.debit_amount),
                credit_amount: Set(item.credit_amount),
                sequence: Set(i32::try_from(index).unwrap_or(i32::MAX)),
            };
            row.insert(&txn).await.map_err(map_db_err)?;
        }
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(recurring = %id, "created recurring transaction");
        self.get(ctx, id).await
    }

    /// Fetches one recurring transaction with its template.
    pub async fn get(
        &self,
        ctx: &TenantContext,
        id: RecurringTransactionId,
    ) -> AppResult<RecurringTransaction> {
        let model = recurring_transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("recurring transaction {id}")))?;
        ctx.ensure_business(BusinessId::from_uuid(model.business_id))?;

        let template = recurring_template_items::Entity::find()
            .filter(
                recurring_template_items::Column::RecurringTransactionId.eq(id.into_inner()),
            )
            .order_by_asc(recurring_template_items::Column::Sequence)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        convert::recurring_transaction(model, template)
    }

    /// Lists a business's recurring transactions.
    pub async fn list(
        &self,
        ctx: &TenantContext,
        active_only: bool,
    ) -> AppResult<Vec<RecurringTransaction>> {
        let mut query = recurring_transactions::Entity::find()
            .filter(
                recurring_transactions::Column::BusinessId.eq(ctx.business_id.into_inner()),
            );
        if active_only {
            query = query.filter(recurring_transactions::Column::IsActive.eq(true));
        }
        let models = query.all(&self.db).await.map_err(map_db_err)?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let template = recurring_template_items::Entity::find()
                .filter(
                    recurring_template_items::Column::RecurringTransactionId.eq(model.id),
                )
                .order_by_asc(recurring_template_items::Column::Sequence)
                .all(&self.db)
                .await
                .map_err(map_db_err)?;
            out.push(convert::recurring_transaction(model, template)?);
        }
        Ok(out)
    }

    /// Activates or deactivates a schedule.
    pub async fn set_active(
        &self,
        ctx: &TenantContext,
        id: RecurringTransactionId,
        is_active: bool,
    ) -> AppResult<RecurringTransaction> {
        self.get(ctx, id).await?;
        let mut active: recurring_transactions::ActiveModel =
            recurring_transactions::ActiveModel {
                id: Set(id.into_inner()),
                ..Default::default()
            };
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await.map_err(map_db_err)?;
        self.get(ctx, id).await
    }

    /// Materializes a due schedule into a posted voucher and increments
    /// `occurrences_generated`, all in one transaction.
    pub async fn generate(
        &self,
        ctx: &TenantContext,
        id: RecurringTransactionId,
        today: NaiveDate,
    ) -> AppResult<Voucher> {
        let recurring = self.get(ctx, id).await?;
        let due_date = schedule::next_due_date(&recurring).ok_or_else(|| {
            AppError::Validation(format!(
                "recurring transaction {} is exhausted",
                recurring.name
            ))
        })?;

        let vouchers = VoucherRepository::new(self.db.clone());
        let voucher_type = vouchers
            .load_voucher_type(ctx, recurring.voucher_type_id)
            .await?;
        let year = vouchers.year_for_date(ctx, due_date).await?;
        let (voucher_number, number_exists) = vouchers
            .resolve_number(ctx, &voucher_type, &year, None)
            .await?;

        let inputs: Vec<VoucherItemInput> = recurring
            .template
            .iter()
            .map(|item| VoucherItemInput {
                id: None,
                ledger_account_id: item.ledger_account_id,
                cost_center_id: item.cost_center_id,
                debit_amount: item.debit_amount,
                credit_amount: item.credit_amount,
                narration: None,
            })
            .collect();
        let (accounts, cost_centers) = vouchers.load_line_refs(&inputs).await?;

        let (plan, due_date) = RecurringService::plan_voucher(
            &recurring,
            &voucher_type,
            &year,
            voucher_number,
            number_exists,
            today,
            ctx.user_id,
            lookup(accounts, "ledger account"),
            lookup(cost_centers, "cost center"),
        )?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let now = Utc::now();
        vouchers.insert_voucher(&txn, &plan.voucher).await?;
        for item in &plan.items {
            vouchers.insert_item(&txn, item).await?;
        }
        vouchers.insert_journal(&txn, &plan.journal, now).await?;

        let mut active: recurring_transactions::ActiveModel =
            recurring_transactions::ActiveModel {
                id: Set(id.into_inner()),
                ..Default::default()
            };
        active.occurrences_generated = Set(recurring.occurrences_generated + 1);
        active.updated_at = Set(now.into());
        active.update(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(
            recurring = %id,
            voucher = %plan.voucher.id,
            date = %due_date,
            "generated recurring voucher"
        );
        Ok(plan.voucher)
    }

    /// Generates every due schedule, continuing past individual failures,
    /// and reports the counts.
    pub async fn process_due(
        &self,
        ctx: &TenantContext,
        today: NaiveDate,
    ) -> AppResult<ProcessSummary> {
        let due: Vec<RecurringTransactionId> = self
            .list(ctx, true)
            .await?
            .into_iter()
            .filter(|recurring| schedule::is_due(recurring, today))
            .map(|recurring| recurring.id)
            .collect();

        let mut summary = ProcessSummary::default();
        for id in due {
            match self.generate(ctx, id, today).await {
                Ok(_) => summary.generated += 1,
                Err(err) => {
                    summary.failed += 1;
                    tracing::warn!(recurring = %id, error = %err, "recurring generation failed");
                }
            }
        }
        Ok(summary)
    }
}
