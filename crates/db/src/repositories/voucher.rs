//! Voucher repository: create/update/post/unpost/delete, applying the
//! core engine's write plans inside database transactions.
//!
//! Journal entries are only ever written here, in lockstep with their
//! voucher: generated on post, regenerated wholesale on update, removed on
//! unpost and delete. All-or-nothing; a failed step rolls the whole
//! operation back.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use kontu_core::fiscal::FinancialYear;
use kontu_core::journal::JournalEntry;
use kontu_core::tenant::TenantContext;
use kontu_core::voucher::numbering;
use kontu_core::voucher::service::{AccountRef, CostCenterRef, VoucherService};
use kontu_core::voucher::types::{
    CreateVoucherInput, UpdateVoucherInput, Voucher, VoucherItem, VoucherItemInput, VoucherType,
};
use kontu_shared::types::{
    BusinessId, CostCenterId, FinancialYearId, LedgerAccountId, PageRequest, PageResponse,
    PartyId, VoucherId, VoucherTypeId,
};
use kontu_shared::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{convert, map_db_err};
use crate::entities::{
    cost_centers, financial_years, journal_entries, ledger_accounts, voucher_items,
    voucher_types, vouchers,
};

/// Filter options for listing vouchers.
#[derive(Debug, Clone, Default)]
pub struct VoucherFilter {
    /// Filter by voucher type.
    pub voucher_type_id: Option<VoucherTypeId>,
    /// Filter by financial year.
    pub financial_year_id: Option<FinancialYearId>,
    /// Filter by party.
    pub party_id: Option<PartyId>,
    /// Filter by posted state.
    pub is_posted: Option<bool>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// A voucher with its line items.
#[derive(Debug, Clone)]
pub struct VoucherWithItems {
    /// Voucher header.
    pub voucher: Voucher,
    /// Line items, in sequence order.
    pub items: Vec<VoucherItem>,
}

/// Repository for vouchers and their journal entries.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    db: DatabaseConnection,
}

impl VoucherRepository {
    /// Creates a new voucher repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a voucher (and, when posted, its journal entries)
    /// atomically.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        input: CreateVoucherInput,
    ) -> AppResult<VoucherWithItems> {
        ctx.ensure_business(input.business_id)?;
        let voucher_type = self.load_voucher_type(ctx, input.voucher_type_id).await?;
        let year = self.year_for_date(ctx, input.date).await?;
        let (voucher_number, number_exists) = self
            .resolve_number(ctx, &voucher_type, &year, input.voucher_number.clone())
            .await?;
        let (accounts, cost_centers) = self.load_line_refs(&input.items).await?;

        let plan = VoucherService::plan_create(
            &input,
            &voucher_type,
            &year,
            voucher_number,
            number_exists,
            lookup(accounts, "ledger account"),
            lookup(cost_centers, "cost center"),
        )?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let now = Utc::now();
        self.insert_voucher(&txn, &plan.voucher).await?;
        for item in &plan.items {
            self.insert_item(&txn, item).await?;
        }
        self.insert_journal(&txn, &plan.journal, now).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(
            voucher = %plan.voucher.id,
            number = %plan.voucher.voucher_number,
            posted = plan.voucher.is_posted,
            "created voucher"
        );
        Ok(VoucherWithItems {
            voucher: plan.voucher,
            items: plan.items,
        })
    }

    /// Updates a voucher: diffs the item set by id and, for a posted
    /// voucher, regenerates its journal entries wholesale.
    pub async fn update(
        &self,
        ctx: &TenantContext,
        voucher_id: VoucherId,
        input: UpdateVoucherInput,
    ) -> AppResult<VoucherWithItems> {
        let existing = self.get(ctx, voucher_id).await?;
        let current_year = self.load_year(ctx, existing.voucher.financial_year_id).await?;
        let target_year = self.year_for_date(ctx, input.date).await?;
        let (accounts, cost_centers) = self.load_line_refs(&input.items).await?;

        let plan = VoucherService::plan_update(
            &existing.voucher,
            &existing.items,
            &input,
            &current_year,
            &target_year,
            lookup(accounts, "ledger account"),
            lookup(cost_centers, "cost center"),
        )?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        let now = Utc::now();

        // Header.
        let mut active: vouchers::ActiveModel = vouchers::ActiveModel {
            id: Set(voucher_id.into_inner()),
            ..Default::default()
        };
        active.financial_year_id = Set(plan.voucher.financial_year_id.into_inner());
        active.date = Set(plan.voucher.date);
        active.party_id = Set(plan.voucher.party_id.map(PartyId::into_inner));
        active.narration = Set(plan.voucher.narration.clone());
        active.reference = Set(plan.voucher.reference.clone());
        active.total_amount = Set(plan.voucher.total_amount);
        active.updated_by = Set(plan.voucher.updated_by.map(kontu_shared::types::UserId::into_inner));
        active.updated_at = Set(now.into());
        active.update(&txn).await.map_err(map_db_err)?;

        // Stale journal entries go first; the posted set is re-emitted
        // below from the plan.
        self.delete_journal(&txn, voucher_id).await?;

        // Item diff.
        for item_id in &plan.deleted_item_ids {
            voucher_items::Entity::delete_by_id(item_id.into_inner())
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
        }
        for item in &plan.updated_items {
            let mut active: voucher_items::ActiveModel = voucher_items::ActiveModel {
                id: Set(item.id.into_inner()),
                ..Default::default()
            };
            active.ledger_account_id = Set(item.ledger_account_id.into_inner());
            active.cost_center_id = Set(item.cost_center_id.map(CostCenterId::into_inner));
            active.debit_amount = Set(item.debit_amount);
            active.credit_amount = Set(item.credit_amount);
            active.narration = Set(item.narration.clone());
            active.sequence = Set(item.sequence);
            active.update(&txn).await.map_err(map_db_err)?;
        }
        for item in &plan.inserted_items {
            self.insert_item(&txn, item).await?;
        }

        self.insert_journal(&txn, &plan.journal, now).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(
            voucher = %voucher_id,
            updated = plan.updated_items.len(),
            inserted = plan.inserted_items.len(),
            deleted = plan.deleted_item_ids.len(),
            "updated voucher"
        );
        self.get(ctx, voucher_id).await
    }

    /// Posts a draft voucher: generates its journal entries and flips
    /// `is_posted`, in one transaction.
    pub async fn post(&self, ctx: &TenantContext, voucher_id: VoucherId) -> AppResult<Voucher> {
        let existing = self.get(ctx, voucher_id).await?;
        let year = self.load_year(ctx, existing.voucher.financial_year_id).await?;
        let journal = VoucherService::plan_post(&existing.voucher, &existing.items, &year)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        self.delete_journal(&txn, voucher_id).await?;
        self.insert_journal(&txn, &journal, Utc::now()).await?;
        self.set_posted(&txn, voucher_id, true).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(voucher = %voucher_id, entries = journal.len(), "posted voucher");
        let mut voucher = existing.voucher;
        voucher.is_posted = true;
        Ok(voucher)
    }

    /// Unposts a voucher: deletes its journal entries and clears
    /// `is_posted`, in one transaction.
    pub async fn unpost(&self, ctx: &TenantContext, voucher_id: VoucherId) -> AppResult<Voucher> {
        let existing = self.get(ctx, voucher_id).await?;
        let year = self.load_year(ctx, existing.voucher.financial_year_id).await?;
        VoucherService::plan_unpost(&existing.voucher, &year)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        self.delete_journal(&txn, voucher_id).await?;
        self.set_posted(&txn, voucher_id, false).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(voucher = %voucher_id, "unposted voucher");
        let mut voucher = existing.voucher;
        voucher.is_posted = false;
        Ok(voucher)
    }

    /// Deletes a voucher together with its items and journal entries.
    pub async fn delete(&self, ctx: &TenantContext, voucher_id: VoucherId) -> AppResult<()> {
        let existing = self.get(ctx, voucher_id).await?;
        let year = self.load_year(ctx, existing.voucher.financial_year_id).await?;
        VoucherService::plan_delete(&existing.voucher, &year)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        self.delete_journal(&txn, voucher_id).await?;
        voucher_items::Entity::delete_many()
            .filter(voucher_items::Column::VoucherId.eq(voucher_id.into_inner()))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        vouchers::Entity::delete_by_id(voucher_id.into_inner())
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(voucher = %voucher_id, "deleted voucher");
        Ok(())
    }

    /// Fetches a voucher with its items.
    pub async fn get(
        &self,
        ctx: &TenantContext,
        voucher_id: VoucherId,
    ) -> AppResult<VoucherWithItems> {
        let model = vouchers::Entity::find_by_id(voucher_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("voucher {voucher_id}")))?;
        ctx.ensure_business(BusinessId::from_uuid(model.business_id))?;

        let items = voucher_items::Entity::find()
            .filter(voucher_items::Column::VoucherId.eq(voucher_id.into_inner()))
            .order_by_asc(voucher_items::Column::Sequence)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(VoucherWithItems {
            voucher: convert::voucher(model),
            items: items.into_iter().map(convert::voucher_item).collect(),
        })
    }

    /// Lists vouchers with filters and pagination, newest first.
    pub async fn list(
        &self,
        ctx: &TenantContext,
        filter: VoucherFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Voucher>> {
        let mut query = vouchers::Entity::find()
            .filter(vouchers::Column::BusinessId.eq(ctx.business_id.into_inner()));

        if let Some(voucher_type_id) = filter.voucher_type_id {
            query = query.filter(vouchers::Column::VoucherTypeId.eq(voucher_type_id.into_inner()));
        }
        if let Some(year_id) = filter.financial_year_id {
            query = query.filter(vouchers::Column::FinancialYearId.eq(year_id.into_inner()));
        }
        if let Some(party_id) = filter.party_id {
            query = query.filter(vouchers::Column::PartyId.eq(party_id.into_inner()));
        }
        if let Some(is_posted) = filter.is_posted {
            query = query.filter(vouchers::Column::IsPosted.eq(is_posted));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(vouchers::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(vouchers::Column::Date.lte(to));
        }

        let paginator = query
            .order_by_desc(vouchers::Column::Date)
            .order_by_desc(vouchers::Column::CreatedAt)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await.map_err(map_db_err)?;
        let models = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await
            .map_err(map_db_err)?;

        Ok(PageResponse::new(
            models.into_iter().map(convert::voucher).collect(),
            page.page,
            page.per_page,
            total,
        ))
    }

    /// Lists a business's voucher types.
    pub async fn list_types(&self, ctx: &TenantContext) -> AppResult<Vec<VoucherType>> {
        voucher_types::Entity::find()
            .filter(voucher_types::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(convert::voucher_type)
            .collect()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    pub(crate) async fn load_voucher_type(
        &self,
        ctx: &TenantContext,
        voucher_type_id: VoucherTypeId,
    ) -> AppResult<VoucherType> {
        let model = voucher_types::Entity::find_by_id(voucher_type_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("voucher type {voucher_type_id}")))?;
        ctx.ensure_business(BusinessId::from_uuid(model.business_id))?;
        convert::voucher_type(model)
    }

    async fn load_year(
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

    pub(crate) async fn year_for_date(
        &self,
        ctx: &TenantContext,
        date: NaiveDate,
    ) -> AppResult<FinancialYear> {
        let models = financial_years::Entity::find()
            .filter(financial_years::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(financial_years::Column::StartDate.lte(date))
            .filter(financial_years::Column::EndDate.gte(date))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        models.map(convert::financial_year).ok_or_else(|| {
            AppError::Validation(format!("no financial year covers date {date}"))
        })
    }

    /// Resolves the voucher number: a manual number is checked for
    /// collision; an automatic one continues the (type, year) sequence.
    pub(crate) async fn resolve_number(
        &self,
        ctx: &TenantContext,
        voucher_type: &VoucherType,
        year: &FinancialYear,
        manual: Option<String>,
    ) -> AppResult<(String, bool)> {
        if let Some(number) = manual {
            let exists = self.number_exists(ctx, voucher_type, year, &number).await?;
            return Ok((number, exists));
        }

        let numbers: Vec<String> = vouchers::Entity::find()
            .filter(vouchers::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(vouchers::Column::VoucherTypeId.eq(voucher_type.id.into_inner()))
            .filter(vouchers::Column::FinancialYearId.eq(year.id.into_inner()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|model| model.voucher_number)
            .collect();
        let max_sequence = numbers
            .iter()
            .filter_map(|number| numbering::parse_sequence(voucher_type, number))
            .max();
        let sequence = numbering::next_sequence(voucher_type, max_sequence);
        Ok((numbering::format_number(voucher_type, sequence), false))
    }

    async fn number_exists(
        &self,
        ctx: &TenantContext,
        voucher_type: &VoucherType,
        year: &FinancialYear,
        number: &str,
    ) -> AppResult<bool> {
        let count = vouchers::Entity::find()
            .filter(vouchers::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(vouchers::Column::VoucherTypeId.eq(voucher_type.id.into_inner()))
            .filter(vouchers::Column::FinancialYearId.eq(year.id.into_inner()))
            .filter(vouchers::Column::VoucherNumber.eq(number))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(count > 0)
    }

    /// Prefetches the accounts and cost centers referenced by a line set,
    /// so the core's synchronous lookups run against in-memory maps.
    pub(crate) async fn load_line_refs(
        &self,
        items: &[VoucherItemInput],
    ) -> AppResult<(
        HashMap<LedgerAccountId, AccountRef>,
        HashMap<CostCenterId, CostCenterRef>,
    )> {
        let account_ids: Vec<uuid::Uuid> = items
            .iter()
            .map(|item| item.ledger_account_id.into_inner())
            .collect();
        let accounts = ledger_accounts::Entity::find()
            .filter(ledger_accounts::Column::Id.is_in(account_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|model| {
                (
                    LedgerAccountId::from_uuid(model.id),
                    AccountRef {
                        id: LedgerAccountId::from_uuid(model.id),
                        business_id: BusinessId::from_uuid(model.business_id),
                        is_active: model.is_active,
                    },
                )
            })
            .collect();

        let cost_center_ids: Vec<uuid::Uuid> = items
            .iter()
            .filter_map(|item| item.cost_center_id.map(CostCenterId::into_inner))
            .collect();
        let centers = cost_centers::Entity::find()
            .filter(cost_centers::Column::Id.is_in(cost_center_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|model| {
                (
                    CostCenterId::from_uuid(model.id),
                    CostCenterRef {
                        id: CostCenterId::from_uuid(model.id),
                        business_id: BusinessId::from_uuid(model.business_id),
                        is_active: model.is_active,
                    },
                )
            })
            .collect();

        Ok((accounts, centers))
    }

    pub(crate) async fn insert_voucher(
        &self,
        txn: &DatabaseTransaction,
        voucher: &Voucher,
    ) -> AppResult<()> {
        let now = Utc::now();
        let model = vouchers::ActiveModel {
            id: Set(voucher.id.into_inner()),
            business_id: Set(voucher.business_id.into_inner()),
            voucher_type_id: Set(voucher.voucher_type_id.into_inner()),
            financial_year_id: Set(voucher.financial_year_id.into_inner()),
            voucher_number: Set(voucher.voucher_number.clone()),
            date: Set(voucher.date),
            party_id: Set(voucher.party_id.map(PartyId::into_inner)),
            narration: Set(voucher.narration.clone()),
            reference: Set(voucher.reference.clone()),
            is_posted: Set(voucher.is_posted),
            total_amount: Set(voucher.total_amount),
            created_by: Set(voucher.created_by.into_inner()),
            updated_by: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        model.insert(txn).await.map_err(map_db_err)?;
        Ok(())
    }

    pub(crate) async fn insert_item(&self, txn: &DatabaseTransaction, item: &VoucherItem) -> AppResult<()> {
        let model = voucher_items::ActiveModel {
            id: Set(item.id.into_inner()),
            voucher_id: Set(item.voucher_id.into_inner()),
            ledger_account_id: Set(item.ledger_account_id.into_inner()),
            cost_center_id: Set(item.cost_center_id.map(CostCenterId::into_inner)),
            debit_amount: Set(item.debit_amount),
            credit_amount: Set(item.credit_amount),
            narration: Set(item.narration.clone()),
            sequence: Set(item.sequence),
        };
        model.insert(txn).await.map_err(map_db_err)?;
        Ok(())
    }

    pub(crate) async fn insert_journal(
        &self,
        txn: &DatabaseTransaction,
        entries: &[JournalEntry],
        now: chrono::DateTime<Utc>,
    ) -> AppResult<()> {
        for entry in entries {
            let model = journal_entries::ActiveModel {
                id: Set(entry.id.into_inner()),
                business_id: Set(entry.business_id.into_inner()),
                voucher_id: Set(entry.voucher_id.into_inner()),
                ledger_account_id: Set(entry.ledger_account_id.into_inner()),
                cost_center_id: Set(entry.cost_center_id.map(CostCenterId::into_inner)),
                financial_year_id: Set(entry.financial_year_id.into_inner()),
                date: Set(entry.date),
                debit_amount: Set(entry.debit_amount),
                credit_amount: Set(entry.credit_amount),
                narration: Set(entry.narration.clone()),
                created_at: Set(now.into()),
            };
            model.insert(txn).await.map_err(map_db_err)?;
        }
        Ok(())
    }

    async fn delete_journal<C: ConnectionTrait>(
        &self,
        conn: &C,
        voucher_id: VoucherId,
    ) -> AppResult<()> {
        journal_entries::Entity::delete_many()
            .filter(journal_entries::Column::VoucherId.eq(voucher_id.into_inner()))
            .exec(conn)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn set_posted(
        &self,
        txn: &DatabaseTransaction,
        voucher_id: VoucherId,
        is_posted: bool,
    ) -> AppResult<()> {
        let mut active: vouchers::ActiveModel = vouchers::ActiveModel {
            id: Set(voucher_id.into_inner()),
            ..Default::default()
        };
        active.is_posted = Set(is_posted);
        active.updated_at = Set(Utc::now().into());
        active.update(txn).await.map_err(map_db_err)?;
        Ok(())
    }
}

/// Wraps a prefetched reference map as the synchronous lookup closure the
/// core engine expects.
pub(crate) fn lookup<K, V>(map: HashMap<K, V>, kind: &'static str) -> impl Fn(K) -> AppResult<V>
where
    K: std::hash::Hash + Eq + std::fmt::Display + Copy,
    V: Clone,
{
    move |id: K| {
        map.get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("{kind} {id}")))
    }
}
