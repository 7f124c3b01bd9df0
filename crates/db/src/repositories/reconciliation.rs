//! Reconciliation repository.
//!
//! Item add/remove recomputes the reconciled balance inside the same
//! transaction, so readers never observe a stale figure next to a changed
//! item set.

use chrono::{NaiveDate, Utc};
use kontu_core::accounts::types::{AccountNature, LedgerAccount};
use kontu_core::journal::JournalEntry;
use kontu_core::reconcile::service::{ReconcileService, DEFAULT_TOLERANCE};
use kontu_core::reconcile::types::{Reconciliation, ReconciliationItem};
use kontu_core::tenant::TenantContext;
use kontu_shared::types::{
    BusinessId, JournalEntryId, LedgerAccountId, ReconciliationId, ReconciliationItemId,
};
use kontu_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use std::str::FromStr;

use super::{convert, map_db_err};
use crate::entities::{
    account_groups, journal_entries, ledger_accounts, reconciliation_items, reconciliations,
};

/// Repository for bank reconciliations.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Starts a reconciliation for a bank account. The book-balance
    /// snapshot is recomputed through the balance engine as of the
    /// statement date; it is a convenience figure, never authoritative.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        ledger_account_id: LedgerAccountId,
        statement_date: NaiveDate,
        statement_balance: Decimal,
    ) -> AppResult<Reconciliation> {
        let (account, nature) = self.classified_account(ctx, ledger_account_id).await?;
        ReconcileService::validate_account(&account)?;

        let entries = self
            .account_entries(ctx, ledger_account_id, Some(statement_date))
            .await?;
        let account_balance = kontu_core::balance::engine::BalanceEngine::account_balance(
            &account,
            nature,
            &entries,
            Some(statement_date),
        )
        .signed_toward(nature.normal_side());

        let now = Utc::now();
        let model = reconciliations::ActiveModel {
            id: Set(ReconciliationId::new().into_inner()),
            business_id: Set(ctx.business_id.into_inner()),
            ledger_account_id: Set(ledger_account_id.into_inner()),
            statement_date: Set(statement_date),
            statement_balance: Set(statement_balance),
            account_balance: Set(account_balance),
            reconciled_balance: Set(ReconcileService::reconciled_balance(
                &account, nature, &[],
            )),
            is_completed: Set(false),
            completed_by: Set(None),
            completed_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let inserted = model.insert(&self.db).await.map_err(map_db_err)?;
        tracing::info!(reconciliation = %inserted.id, account = %ledger_account_id, "started reconciliation");
        Ok(convert::reconciliation(inserted))
    }

    /// Links a journal entry and recomputes the reconciled balance, in
    /// one transaction. An entry can be linked to at most one
    /// reconciliation across the whole account history.
    pub async fn add_item(
        &self,
        ctx: &TenantContext,
        reconciliation_id: ReconciliationId,
        journal_entry_id: JournalEntryId,
    ) -> AppResult<Reconciliation> {
        let reconciliation = self.get(ctx, reconciliation_id).await?;
        let entry = self.load_entry(journal_entry_id).await?;
        let already_linked = reconciliation_items::Entity::find()
            .filter(
                reconciliation_items::Column::JournalEntryId.eq(journal_entry_id.into_inner()),
            )
            .count(&self.db)
            .await
            .map_err(map_db_err)?
            > 0;
        ReconcileService::validate_add_item(&reconciliation, &entry, already_linked)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let model = reconciliation_items::ActiveModel {
            id: Set(ReconciliationItemId::new().into_inner()),
            reconciliation_id: Set(reconciliation_id.into_inner()),
            journal_entry_id: Set(journal_entry_id.into_inner()),
            created_at: Set(Utc::now().into()),
        };
        model.insert(&txn).await.map_err(map_db_err)?;
        let updated = self.recompute(&txn, ctx, &reconciliation).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(updated)
    }

    /// Unlinks a journal entry and recomputes, in one transaction.
    pub async fn remove_item(
        &self,
        ctx: &TenantContext,
        reconciliation_id: ReconciliationId,
        journal_entry_id: JournalEntryId,
    ) -> AppResult<Reconciliation> {
        let reconciliation = self.get(ctx, reconciliation_id).await?;
        ReconcileService::validate_remove_item(&reconciliation)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let deleted = reconciliation_items::Entity::delete_many()
            .filter(
                reconciliation_items::Column::ReconciliationId
                    .eq(reconciliation_id.into_inner()),
            )
            .filter(
                reconciliation_items::Column::JournalEntryId.eq(journal_entry_id.into_inner()),
            )
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if deleted.rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "journal entry {journal_entry_id} is not linked to this reconciliation"
            )));
        }
        let updated = self.recompute(&txn, ctx, &reconciliation).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(updated)
    }

    /// Completes a reconciliation once the reconciled balance sits within
    /// tolerance of the statement balance.
    pub async fn complete(
        &self,
        ctx: &TenantContext,
        reconciliation_id: ReconciliationId,
    ) -> AppResult<Reconciliation> {
        let reconciliation = self.get(ctx, reconciliation_id).await?;
        ReconcileService::validate_complete(&reconciliation, DEFAULT_TOLERANCE)?;

        let mut active: reconciliations::ActiveModel = reconciliations::ActiveModel {
            id: Set(reconciliation_id.into_inner()),
            ..Default::default()
        };
        let now = Utc::now();
        active.is_completed = Set(true);
        active.completed_by = Set(Some(ctx.user_id.into_inner()));
        active.completed_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        let updated = active.update(&self.db).await.map_err(map_db_err)?;

        tracing::info!(reconciliation = %reconciliation_id, "completed reconciliation");
        Ok(convert::reconciliation(updated))
    }

    /// Reopens a completed reconciliation.
    pub async fn reopen(
        &self,
        ctx: &TenantContext,
        reconciliation_id: ReconciliationId,
    ) -> AppResult<Reconciliation> {
        let reconciliation = self.get(ctx, reconciliation_id).await?;
        ReconcileService::validate_reopen(&reconciliation)?;

        let mut active: reconciliations::ActiveModel = reconciliations::ActiveModel {
            id: Set(reconciliation_id.into_inner()),
            ..Default::default()
        };
        active.is_completed = Set(false);
        active.completed_by = Set(None);
        active.completed_at = Set(None);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(convert::reconciliation(updated))
    }

    /// Fetches one reconciliation.
    pub async fn get(
        &self,
        ctx: &TenantContext,
        reconciliation_id: ReconciliationId,
    ) -> AppResult<Reconciliation> {
        let model = reconciliations::Entity::find_by_id(reconciliation_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| {
                AppError::NotFound(format!("reconciliation {reconciliation_id}"))
            })?;
        ctx.ensure_business(BusinessId::from_uuid(model.business_id))?;
        Ok(convert::reconciliation(model))
    }

    /// The matched items of a reconciliation.
    pub async fn items(
        &self,
        ctx: &TenantContext,
        reconciliation_id: ReconciliationId,
    ) -> AppResult<Vec<ReconciliationItem>> {
        self.get(ctx, reconciliation_id).await?;
        let rows = reconciliation_items::Entity::find()
            .filter(
                reconciliation_items::Column::ReconciliationId
                    .eq(reconciliation_id.into_inner()),
            )
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(rows.into_iter().map(convert::reconciliation_item).collect())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn recompute<C: ConnectionTrait>(
        &self,
        conn: &C,
        ctx: &TenantContext,
        reconciliation: &Reconciliation,
    ) -> AppResult<Reconciliation> {
        let (account, nature) = self
            .classified_account(ctx, reconciliation.ledger_account_id)
            .await?;

        let entry_ids: Vec<uuid::Uuid> = reconciliation_items::Entity::find()
            .filter(
                reconciliation_items::Column::ReconciliationId
                    .eq(reconciliation.id.into_inner()),
            )
            .all(conn)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|item| item.journal_entry_id)
            .collect();
        let linked: Vec<JournalEntry> = journal_entries::Entity::find()
            .filter(journal_entries::Column::Id.is_in(entry_ids))
            .all(conn)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(convert::journal_entry)
            .collect();

        let reconciled = ReconcileService::reconciled_balance(&account, nature, &linked);

        let mut active: reconciliations::ActiveModel = reconciliations::ActiveModel {
            id: Set(reconciliation.id.into_inner()),
            ..Default::default()
        };
        active.reconciled_balance = Set(reconciled);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(conn).await.map_err(map_db_err)?;
        Ok(convert::reconciliation(updated))
    }

    async fn classified_account(
        &self,
        ctx: &TenantContext,
        account_id: LedgerAccountId,
    ) -> AppResult<(LedgerAccount, AccountNature)> {
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
        let nature = AccountNature::from_str(&group.nature)
            .map_err(|err| AppError::Internal(format!("corrupt nature column: {err}")))?;

        Ok((convert::ledger_account(model)?, nature))
    }

    async fn account_entries(
        &self,
        ctx: &TenantContext,
        account_id: LedgerAccountId,
        up_to: Option<NaiveDate>,
    ) -> AppResult<Vec<JournalEntry>> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(journal_entries::Column::LedgerAccountId.eq(account_id.into_inner()));
        if let Some(limit) = up_to {
            query = query.filter(journal_entries::Column::Date.lte(limit));
        }
        Ok(query
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(convert::journal_entry)
            .collect())
    }

    async fn load_entry(&self, journal_entry_id: JournalEntryId) -> AppResult<JournalEntry> {
        let model = journal_entries::Entity::find_by_id(journal_entry_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("journal entry {journal_entry_id}")))?;
        Ok(convert::journal_entry(model))
    }
}
