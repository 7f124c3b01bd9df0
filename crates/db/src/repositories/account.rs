//! Account repository: chart-of-accounts groups, ledger accounts, and
//! cost centers.

use chrono::Utc;
use kontu_core::accounts::tree::{CostCenterTree, FlatNode, GroupTree};
use kontu_core::accounts::types::{AccountGroup, AccountNature, CostCenter, LedgerAccount};
use kontu_core::tenant::TenantContext;
use kontu_shared::types::{AccountGroupId, BalanceSide, CostCenterId, LedgerAccountId};
use kontu_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use uuid::Uuid;

use super::{convert, map_db_err};
use crate::entities::{account_groups, cost_centers, journal_entries, ledger_accounts, parties};

/// Input for creating an account group.
#[derive(Debug, Clone)]
pub struct CreateGroupInput {
    /// Parent group; `None` creates a new root.
    pub parent_id: Option<AccountGroupId>,
    /// Group name.
    pub name: String,
    /// Accounting nature; must match the parent's.
    pub nature: AccountNature,
    /// Whether the group feeds the gross-profit figure.
    pub affects_gross_profit: bool,
    /// Sibling ordering.
    pub sequence: i32,
}

/// Input for creating a ledger account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// The group the account hangs under.
    pub account_group_id: AccountGroupId,
    /// Account code, unique per business when present.
    pub code: Option<String>,
    /// Account name.
    pub name: String,
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Side the opening balance sits on.
    pub opening_balance_side: BalanceSide,
    /// Bank account flag.
    pub is_bank_account: bool,
    /// Cash account flag.
    pub is_cash_account: bool,
}

/// Input for creating a cost center.
#[derive(Debug, Clone)]
pub struct CreateCostCenterInput {
    /// Parent cost center.
    pub parent_id: Option<CostCenterId>,
    /// Cost center name.
    pub name: String,
    /// Code, unique per business.
    pub code: String,
}

/// Repository for the account and cost-center hierarchies.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Account groups
    // ========================================================================

    /// Loads the full group arena for a business.
    pub async fn group_tree(&self, ctx: &TenantContext) -> AppResult<GroupTree> {
        let rows = account_groups::Entity::find()
            .filter(account_groups::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        let groups = rows
            .into_iter()
            .map(convert::account_group)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(GroupTree::from_rows(groups))
    }

    /// Pre-order (id, name, depth) rows for selection lists.
    pub async fn flatten_groups(
        &self,
        ctx: &TenantContext,
    ) -> AppResult<Vec<FlatNode<AccountGroupId>>> {
        Ok(self.group_tree(ctx).await?.flatten())
    }

    /// Creates an account group under a parent of the same nature.
    pub async fn create_group(
        &self,
        ctx: &TenantContext,
        input: CreateGroupInput,
    ) -> AppResult<AccountGroup> {
        let tree = self.group_tree(ctx).await?;
        tree.validate_new_group(input.parent_id, input.nature)?;

        let now = Utc::now();
        let model = account_groups::ActiveModel {
            id: Set(AccountGroupId::new().into_inner()),
            business_id: Set(ctx.business_id.into_inner()),
            parent_id: Set(input.parent_id.map(AccountGroupId::into_inner)),
            name: Set(input.name),
            nature: Set(input.nature.to_string()),
            affects_gross_profit: Set(input.affects_gross_profit),
            sequence: Set(input.sequence),
            is_system: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let inserted = model.insert(&self.db).await.map_err(map_db_err)?;
        tracing::debug!(group = %inserted.id, "created account group");
        convert::account_group(inserted)
    }

    /// Renames/reorders/reparents a group. Nature is changed through
    /// [`Self::change_nature`] only.
    pub async fn update_group(
        &self,
        ctx: &TenantContext,
        group_id: AccountGroupId,
        name: Option<String>,
        sequence: Option<i32>,
        new_parent_id: Option<Option<AccountGroupId>>,
    ) -> AppResult<AccountGroup> {
        let model = self.find_group(ctx, group_id).await?;
        if model.is_system {
            return Err(AppError::Validation(
                "system account groups cannot be edited".to_string(),
            ));
        }

        if let Some(parent) = new_parent_id {
            let tree = self.group_tree(ctx).await?;
            tree.validate_reparent(group_id, parent)?;
        }

        let mut active: account_groups::ActiveModel = model.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(sequence) = sequence {
            active.sequence = Set(sequence);
        }
        if let Some(parent) = new_parent_id {
            active.parent_id = Set(parent.map(AccountGroupId::into_inner));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_err(map_db_err)?;
        convert::account_group(updated)
    }

    /// Changes a group's nature and cascades it to every descendant,
    /// atomically: either the whole subtree updates or none of it does.
    pub async fn change_nature(
        &self,
        ctx: &TenantContext,
        group_id: AccountGroupId,
        new_nature: AccountNature,
    ) -> AppResult<Vec<AccountGroupId>> {
        let tree = self.group_tree(ctx).await?;
        let affected = tree.cascade_nature(group_id, new_nature)?;
        if affected.is_empty() {
            return Ok(affected);
        }

        let ids: Vec<Uuid> = affected.iter().map(|id| id.into_inner()).collect();
        let txn = self.db.begin().await.map_err(map_db_err)?;
        account_groups::Entity::update_many()
            .col_expr(
                account_groups::Column::Nature,
                Expr::value(new_nature.to_string()),
            )
            .col_expr(
                account_groups::Column::UpdatedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(account_groups::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(account_groups::Column::Id.is_in(ids))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(
            group = %group_id,
            nature = %new_nature,
            descendants = affected.len(),
            "cascaded account group nature"
        );
        Ok(affected)
    }

    /// Deletes a group that has no children and no ledger accounts.
    pub async fn delete_group(
        &self,
        ctx: &TenantContext,
        group_id: AccountGroupId,
    ) -> AppResult<()> {
        let tree = self.group_tree(ctx).await?;
        let has_accounts = ledger_accounts::Entity::find()
            .filter(ledger_accounts::Column::AccountGroupId.eq(group_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(map_db_err)?
            > 0;
        tree.validate_delete(group_id, has_accounts)?;

        account_groups::Entity::delete_by_id(group_id.into_inner())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn find_group(
        &self,
        ctx: &TenantContext,
        group_id: AccountGroupId,
    ) -> AppResult<account_groups::Model> {
        let model = account_groups::Entity::find_by_id(group_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("account group {group_id}")))?;
        ctx.ensure_business(kontu_shared::types::BusinessId::from_uuid(
            model.business_id,
        ))?;
        Ok(model)
    }

    // ========================================================================
    // Ledger accounts
    // ========================================================================

    /// Creates a ledger account under a group of this business.
    pub async fn create_account(
        &self,
        ctx: &TenantContext,
        input: CreateAccountInput,
    ) -> AppResult<LedgerAccount> {
        self.find_group(ctx, input.account_group_id).await?;
        if let Some(code) = &input.code {
            self.ensure_code_free(ctx, code, None).await?;
        }

        let now = Utc::now();
        let model = ledger_accounts::ActiveModel {
            id: Set(LedgerAccountId::new().into_inner()),
            business_id: Set(ctx.business_id.into_inner()),
            account_group_id: Set(input.account_group_id.into_inner()),
            code: Set(input.code),
            name: Set(input.name),
            opening_balance: Set(input.opening_balance),
            opening_balance_side: Set(input.opening_balance_side.to_string()),
            is_bank_account: Set(input.is_bank_account),
            is_cash_account: Set(input.is_cash_account),
            is_system: Set(false),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let inserted = model.insert(&self.db).await.map_err(map_db_err)?;
        tracing::debug!(account = %inserted.id, "created ledger account");
        convert::ledger_account(inserted)
    }

    /// Fetches one ledger account.
    pub async fn get_account(
        &self,
        ctx: &TenantContext,
        account_id: LedgerAccountId,
    ) -> AppResult<LedgerAccount> {
        let model = self.find_account(ctx, account_id).await?;
        convert::ledger_account(model)
    }

    /// Lists ledger accounts, optionally only active ones.
    pub async fn list_accounts(
        &self,
        ctx: &TenantContext,
        active_only: bool,
    ) -> AppResult<Vec<LedgerAccount>> {
        let mut query = ledger_accounts::Entity::find()
            .filter(ledger_accounts::Column::BusinessId.eq(ctx.business_id.into_inner()));
        if active_only {
            query = query.filter(ledger_accounts::Column::IsActive.eq(true));
        }
        query
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(convert::ledger_account)
            .collect()
    }

    /// Updates a ledger account's editable fields.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_account(
        &self,
        ctx: &TenantContext,
        account_id: LedgerAccountId,
        name: Option<String>,
        code: Option<Option<String>>,
        opening_balance: Option<(Decimal, BalanceSide)>,
        is_active: Option<bool>,
    ) -> AppResult<LedgerAccount> {
        let model = self.find_account(ctx, account_id).await?;
        if model.is_system {
            return Err(AppError::Validation(
                "system accounts cannot be edited".to_string(),
            ));
        }
        if let Some(Some(code)) = &code {
            self.ensure_code_free(ctx, code, Some(account_id)).await?;
        }

        let mut active: ledger_accounts::ActiveModel = model.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(code) = code {
            active.code = Set(code);
        }
        if let Some((amount, side)) = opening_balance {
            active.opening_balance = Set(amount);
            active.opening_balance_side = Set(side.to_string());
        }
        if let Some(is_active) = is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_err(map_db_err)?;
        convert::ledger_account(updated)
    }

    /// Deletes a ledger account with no journal entries and no party link.
    pub async fn delete_account(
        &self,
        ctx: &TenantContext,
        account_id: LedgerAccountId,
    ) -> AppResult<()> {
        let model = self.find_account(ctx, account_id).await?;
        if model.is_system {
            return Err(AppError::Validation(
                "system accounts cannot be deleted".to_string(),
            ));
        }

        let has_entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::LedgerAccountId.eq(account_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(map_db_err)?
            > 0;
        if has_entries {
            return Err(AppError::Conflict(
                "ledger account has journal entries".to_string(),
            ));
        }

        let linked_to_party = parties::Entity::find()
            .filter(parties::Column::LedgerAccountId.eq(account_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(map_db_err)?
            > 0;
        if linked_to_party {
            return Err(AppError::Conflict(
                "ledger account is linked to a party".to_string(),
            ));
        }

        ledger_accounts::Entity::delete_by_id(account_id.into_inner())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn find_account(
        &self,
        ctx: &TenantContext,
        account_id: LedgerAccountId,
    ) -> AppResult<ledger_accounts::Model> {
        let model = ledger_accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| AppError::NotFound(format!("ledger account {account_id}")))?;
        ctx.ensure_business(kontu_shared::types::BusinessId::from_uuid(
            model.business_id,
        ))?;
        Ok(model)
    }

    async fn ensure_code_free(
        &self,
        ctx: &TenantContext,
        code: &str,
        exclude: Option<LedgerAccountId>,
    ) -> AppResult<()> {
        let mut query = ledger_accounts::Entity::find()
            .filter(ledger_accounts::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(ledger_accounts::Column::Code.eq(code));
        if let Some(exclude) = exclude {
            query = query.filter(ledger_accounts::Column::Id.ne(exclude.into_inner()));
        }
        let taken = query.count(&self.db).await.map_err(map_db_err)? > 0;
        if taken {
            return Err(AppError::Conflict(format!(
                "account code {code} is already in use"
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Cost centers
    // ========================================================================

    /// Loads the cost-center arena for a business.
    pub async fn cost_center_tree(&self, ctx: &TenantContext) -> AppResult<CostCenterTree> {
        let rows = cost_centers::Entity::find()
            .filter(cost_centers::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(CostCenterTree::from_rows(
            rows.into_iter().map(convert::cost_center).collect(),
        ))
    }

    /// Creates a cost center.
    pub async fn create_cost_center(
        &self,
        ctx: &TenantContext,
        input: CreateCostCenterInput,
    ) -> AppResult<CostCenter> {
        if let Some(parent_id) = input.parent_id {
            let tree = self.cost_center_tree(ctx).await?;
            if tree.get(parent_id).is_none() {
                return Err(AppError::NotFound(format!("cost center {parent_id}")));
            }
        }
        let code_taken = cost_centers::Entity::find()
            .filter(cost_centers::Column::BusinessId.eq(ctx.business_id.into_inner()))
            .filter(cost_centers::Column::Code.eq(&input.code))
            .count(&self.db)
            .await
            .map_err(map_db_err)?
            > 0;
        if code_taken {
            return Err(AppError::Conflict(format!(
                "cost center code {} is already in use",
                input.code
            )));
        }

        let now = Utc::now();
        let model = cost_centers::ActiveModel {
            id: Set(CostCenterId::new().into_inner()),
            business_id: Set(ctx.business_id.into_inner()),
            parent_id: Set(input.parent_id.map(CostCenterId::into_inner)),
            name: Set(input.name),
            code: Set(input.code),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let inserted = model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(convert::cost_center(inserted))
    }

    /// Deletes a cost center with no children and no tagged transactions.
    pub async fn delete_cost_center(
        &self,
        ctx: &TenantContext,
        cost_center_id: CostCenterId,
    ) -> AppResult<()> {
        let tree = self.cost_center_tree(ctx).await?;
        let has_transactions = journal_entries::Entity::find()
            .filter(journal_entries::Column::CostCenterId.eq(cost_center_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(map_db_err)?
            > 0;
        tree.validate_delete(cost_center_id, has_transactions)?;

        cost_centers::Entity::delete_by_id(cost_center_id.into_inner())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}
