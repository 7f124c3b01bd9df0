//! Business bootstrap.
//!
//! Creates a new business together with its system defaults - the default
//! chart of accounts, the eight system voucher types, a cash account, and
//! the first financial year - inside one transaction.

use chrono::{NaiveDate, Utc};
use kontu_core::accounts::defaults::{default_account_groups, default_voucher_types, group_names};
use kontu_shared::types::{BalanceSide, BusinessId, FinancialYearId, LedgerAccountId};
use kontu_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

use super::map_db_err;
use crate::entities::{
    account_groups, businesses, financial_years, ledger_accounts, voucher_types,
};

/// Input for bootstrapping a business.
#[derive(Debug, Clone)]
pub struct CreateBusinessInput {
    /// Business name.
    pub name: String,
    /// First financial year name, e.g. "FY 2025-26".
    pub financial_year_name: String,
    /// First day of the first financial year.
    pub year_start: NaiveDate,
    /// Last day of the first financial year.
    pub year_end: NaiveDate,
}

/// Ids created by the bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapResult {
    /// The new business.
    pub business_id: BusinessId,
    /// Its first (current) financial year.
    pub financial_year_id: FinancialYearId,
    /// The default cash account.
    pub cash_account_id: LedgerAccountId,
}

/// Repository that materializes new businesses.
#[derive(Debug, Clone)]
pub struct BootstrapRepository {
    db: DatabaseConnection,
}

impl BootstrapRepository {
    /// Creates a new bootstrap repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a business with its system defaults, all-or-nothing.
    pub async fn create_business(
        &self,
        input: CreateBusinessInput,
    ) -> AppResult<BootstrapResult> {
        if input.year_end < input.year_start {
            return Err(AppError::Validation(
                "financial year end date is before its start date".to_string(),
            ));
        }

        let business_id = BusinessId::new();
        let now = Utc::now();
        let txn = self.db.begin().await.map_err(map_db_err)?;

        businesses::ActiveModel {
            id: Set(business_id.into_inner()),
            name: Set(input.name),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        let groups = default_account_groups(business_id);
        let mut cash_group = None;
        for group in &groups {
            if group.name == group_names::CASH_IN_HAND {
                cash_group = Some(group.id);
            }
            account_groups::ActiveModel {
                id: Set(group.id.into_inner()),
                business_id: Set(business_id.into_inner()),
                parent_id: Set(group.parent_id.map(|parent| parent.into_inner())),
                name: Set(group.name.clone()),
                nature: Set(group.nature.to_string()),
                affects_gross_profit: Set(group.affects_gross_profit),
                sequence: Set(group.sequence),
                is_system: Set(group.is_system),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
        }
        let cash_group =
            cash_group.ok_or_else(|| AppError::Internal("default chart has no cash group".to_string()))?;

        for voucher_type in default_voucher_types(business_id) {
            voucher_types::ActiveModel {
                id: Set(voucher_type.id.into_inner()),
                business_id: Set(business_id.into_inner()),
                name: Set(voucher_type.name),
                code: Set(voucher_type.code),
                nature: Set(voucher_type.nature.to_string()),
                prefix: Set(voucher_type.prefix),
                auto_increment: Set(voucher_type.auto_increment),
                starting_number: Set(voucher_type.starting_number),
                is_system: Set(voucher_type.is_system),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
        }

        let cash_account_id = LedgerAccountId::new();
        ledger_accounts::ActiveModel {
            id: Set(cash_account_id.into_inner()),
            business_id: Set(business_id.into_inner()),
            account_group_id: Set(cash_group.into_inner()),
            code: Set(Some("CASH".to_string())),
            name: Set("Cash".to_string()),
            opening_balance: Set(Decimal::ZERO),
            opening_balance_side: Set(BalanceSide::Debit.to_string()),
            is_bank_account: Set(false),
            is_cash_account: Set(true),
            is_system: Set(true),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        let financial_year_id = FinancialYearId::new();
        financial_years::ActiveModel {
            id: Set(financial_year_id.into_inner()),
            business_id: Set(business_id.into_inner()),
            name: Set(input.financial_year_name),
            start_date: Set(input.year_start),
            end_date: Set(input.year_end),
            is_current: Set(true),
            is_locked: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::info!(business = %business_id, "bootstrapped business");
        Ok(BootstrapResult {
            business_id,
            financial_year_id,
            cash_account_id,
        })
    }
}
