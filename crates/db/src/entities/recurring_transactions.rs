//! `SeaORM` entity for the recurring_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub business_id: Uuid,
    pub voucher_type_id: Uuid,
    pub name: String,
    /// One of: daily, weekly, monthly, quarterly, yearly.
    pub frequency: String,
    pub day_of_month: Option<i32>,
    /// ISO day of week, 1 = Monday .. 7 = Sunday.
    pub day_of_week: Option<i32>,
    pub month: Option<i32>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub occurrences: Option<i32>,
    pub occurrences_generated: i32,
    pub narration: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recurring_template_items::Entity")]
    RecurringTemplateItems,
}

impl Related<super::recurring_template_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringTemplateItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
