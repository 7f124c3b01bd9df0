//! `SeaORM` entity for the account_reconciliations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "account_reconciliations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub business_id: Uuid,
    pub ledger_account_id: Uuid,
    pub statement_date: Date,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub statement_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub account_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub reconciled_balance: Decimal,
    pub is_completed: bool,
    pub completed_by: Option<Uuid>,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reconciliation_items::Entity")]
    ReconciliationItems,
}

impl Related<super::reconciliation_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReconciliationItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
