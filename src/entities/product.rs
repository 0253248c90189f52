use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    /// Global on-hand quantity across all warehouses.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub stock: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub unit_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub sale_price: Decimal,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lot_balance::Entity")]
    LotBalance,
}

impl Related<super::lot_balance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LotBalance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
