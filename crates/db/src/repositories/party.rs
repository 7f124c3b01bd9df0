//! Party repository: customers and suppliers with their backing ledger
//! accounts, outstanding balances, and aging.

use chrono::{NaiveDate, Utc};
use kontu_core::accounts::defaults::group_names;
use kontu_core::balance::aging::{
    aging_buckets, outstanding_balance, AgingReport, AgingSide, AgingVoucher,
};
use kontu_core::party::{Party, PartyKind};
use kontu_core::tenant::TenantContext;
use kontu_core::voucher::types::VoucherNature;
use kontu_shared::types::{BusinessId, LedgerAccountId, PartyId};
use kontu_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use std::collections::HashMap;
use std::str::FromStr;

use super::{convert, map_db_err};
use crate::entities::{
    account_groups, journal_entries, ledger_accounts, parties, voucher_types, vouchers,
};

/// Input for creating a party.
#[derive(Debug, Clone)]
pub struct CreatePartyInput {
    /// Party name (also the backing account's name).
    pub name: String,
    /// Classification.
    pub kind: PartyKind,
    /// Optional credit limit.
    pub credit_limit: Option<Decimal>,
    /// Optional credit period in days.
    pub credit_period_days: Option<i32>,
}

/// Repository for parties.
#[derive(Debug, Clone)]
pub struct PartyRepository {
    db: DatabaseConnection,
}

impl PartyRepository {
    /// Creates a new party repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a party together with its backing ledger account, in one
    /// transaction. Customers back onto Accounts Receivable, suppliers
    /// (and both-kind parties' payable side) onto Accounts Payable.
    pub async fn create(&self, ctx: &TenantContext, input: CreatePartyInput) -> AppResult<Party> {
        let control_group = match input.kind {
            PartyKind::Customer | PartyKind::Both => group_names::ACCOUNTS_RECEIVABLE,
            PartyKind::Supplier => group_names::ACCOUNTS_PAYABLE,
        };
        let group = account_groups::Entity::find()
            .filter(account_groups::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(account_groups::Column::Name.eq(control_group))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("account group {control_group}")))?;

        let now = Utc::now();
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let account_id = LedgerAccountId::new();
        let account = ledger_accounts::ActiveModel {
            id: Set(account_id.into_inner()),
            business_id: Set(ctx.business_id.into_inner()),
            account_group_id: Set(group.id),
            code: Set(None),
            name: Set(input.name.clone()),
            opening_balance: Set(Decimal::ZERO),
            opening_balance_side: Set(kontu_shared::types::BalanceSide::Debit.to_string()),
            is_bank_account: Set(false),
            is_cash_account: Set(false),
            is_system: Set(false),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        account.insert(&txn).await.map_err(map_db_err)?;

        let party = parties::ActiveModel {
            id: Set(PartyId::new().into_inner()),
            business_id: Set(ctx.business_id.into_inner()),
            ledger_account_id: Set(account_id.into_inner()),
            name: Set(input.name),
            kind: Set(input.kind.to_string()),
            credit_limit: Set(input.credit_limit),
            credit_period_days: Set(input.credit_period_days),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let inserted = party.insert(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(party = %inserted.id, kind = %input.kind, "created party");
        convert::party(inserted)
    }

    /// Fetches one party.
    pub async fn get(&self, ctx: &TenantContext, party_id: PartyId) -> AppResult<Party> {
        let model = self.find(ctx, party_id).await?;
        convert::party(model)
    }

    /// Lists a business's parties.
    pub async fn list(&self, ctx: &TenantContext) -> AppResult<Vec<Party>> {
        parties::Entity::find()
            .filter(parties::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(convert::party)
            .collect()
    }

    /// Updates a party's editable fields.
    pub async fn update(
        &self,
        ctx: &TenantContext,
        party_id: PartyId,
        name: Option<String>,
        credit_limit: Option<Option<Decimal>>,
        credit_period_days: Option<Option<i32>>,
    ) -> AppResult<Party> {
        let model = self.find(ctx, party_id).await?;
        let mut active: parties::ActiveModel = model.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(limit) = credit_limit {
            active.credit_limit = Set(limit);
        }
        if let Some(period) = credit_period_days {
            active.credit_period_days = Set(period);
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(map_db_err)?;
        convert::party(updated)
    }

    /// Deletes a party and its backing account, blocked while journal
    /// entries exist against the account.
    pub async fn delete(&self, ctx: &TenantContext, party_id: PartyId) -> AppResult<()> {
        let model = self.find(ctx, party_id).await?;
        let party = convert::party(model)?;

        let has_entries = journal_entries::Entity::find()
            .filter(
                journal_entries::Column::LedgerAccountId
                    .eq(party.ledger_account_id.into_inner()),
            )
            .count(&self.db)
            .await
            .map_err(map_db_err)?
            > 0;
        party.validate_delete(has_entries)?;

        let txn = self.db.begin().await.map_err(map_db_err)?;
        parties::Entity::delete_by_id(party.id.into_inner())
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        ledger_accounts::Entity::delete_by_id(party.ledger_account_id.into_inner())
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }

    /// The party's outstanding balance on one side as of a date.
    pub async fn outstanding(
        &self,
        ctx: &TenantContext,
        party_id: PartyId,
        side: AgingSide,
        as_of: NaiveDate,
    ) -> AppResult<Decimal> {
        let vouchers = self.aging_vouchers(ctx, party_id).await?;
        Ok(outstanding_balance(side, &vouchers, as_of))
    }

    /// Ages the party's outstanding balance into buckets.
    pub async fn aging(
        &self,
        ctx: &TenantContext,
        party_id: PartyId,
        side: AgingSide,
        as_of: NaiveDate,
        periods: &[u32],
    ) -> AppResult<AgingReport> {
        self.find(ctx, party_id).await?;
        let vouchers = self.aging_vouchers(ctx, party_id).await?;
        let outstanding = outstanding_balance(side, &vouchers, as_of);
        Ok(aging_buckets(
            party_id,
            outstanding,
            &vouchers,
            as_of,
            periods,
            side,
        ))
    }

    /// Loads the party's posted vouchers with their type natures.
    async fn aging_vouchers(
        &self,
        ctx: &TenantContext,
        party_id: PartyId,
    ) -> AppResult<Vec<AgingVoucher>> {
        let natures: HashMap<uuid::Uuid, VoucherNature> = voucher_types::Entity::find()
            .filter(voucher_types::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .filter_map(|model| {
                VoucherNature::from_str(&model.nature)
                    .ok()
                    .map(|nature| (model.id, nature))
            })
            .collect();

        let rows = vouchers::Entity::find()
            .filter(vouchers::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(vouchers::Column::PartyId.eq(party_id.into_inner()))
            .filter(vouchers::Column::IsPosted.eq(true))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|model| {
                natures.get(&model.voucher_type_id).map(|nature| AgingVoucher {
                    date: model.date,
                    nature: *nature,
                    amount: model.total_amount,
                })
            })
            .collect())
    }

    async fn find(&self, ctx: &TenantContext, party_id: PartyId) -> AppResult<parties::Model> {
        let model = parties::Entity::find_by_id(party_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("party {party_id}")))?;
        ctx.ensure_business(BusinessId::from_uuid(model.business_id))?;
        Ok(model)
    }
}
