//! `SeaORM` entity for the budget_items table.
//!
//! Twelve monthly columns, first financial-year month first, plus the
//! annual amount. (budget, account, cost center) is unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub budget_id: Uuid,
    pub ledger_account_id: Uuid,
    pub cost_center_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_01: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_02: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_03: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_04: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_05: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_06: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_07: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_08: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_09: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_10: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_11: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub month_12: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub annual_amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id"
    )]
    Budgets,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
