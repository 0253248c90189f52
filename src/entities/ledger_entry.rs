use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a stock movement relative to the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum MovementDirection {
    #[sea_orm(string_value = "inbound")]
    Inbound,
    #[sea_orm(string_value = "outbound")]
    Outbound,
}

/// Business operation that produced a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum LedgerClass {
    #[sea_orm(string_value = "exchange")]
    Exchange,
    #[sea_orm(string_value = "exchange_reversal")]
    ExchangeReversal,
    #[sea_orm(string_value = "warehouse_movement")]
    WarehouseMovement,
    /// Outbound movement flagged as spoilage, kept distinct so write-offs
    /// stay separable from ordinary transfers in kardex reads.
    #[sea_orm(string_value = "spoilage")]
    Spoilage,
}

/// Append-only record of one balance mutation. Rows are never updated or
/// deleted; reversals append compensating entries instead.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Number of the document this entry belongs to.
    pub document_number: String,

    pub class: LedgerClass,

    pub direction: MovementDirection,

    pub product_code: String,

    pub lot_code: String,

    pub warehouse_id: i32,

    /// Quantity moved, always positive. Sign comes from `direction`.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub quantity: Decimal,

    /// Product cost captured at posting time.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub unit_cost: Decimal,

    /// Product sale price captured at posting time.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub unit_price: Decimal,

    /// Global product stock after this entry was applied.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub stock_after: Decimal,

    pub occurred_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductCode",
        to = "super::product::Column::Code"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_inbound(&self) -> bool {
        self.direction == MovementDirection::Inbound
    }

    pub fn is_outbound(&self) -> bool {
        self.direction == MovementDirection::Outbound
    }

    /// Quantity with direction applied (positive inbound, negative outbound).
    pub fn signed_quantity(&self) -> Decimal {
        match self.direction {
            MovementDirection::Inbound => self.quantity,
            MovementDirection::Outbound => -self.quantity,
        }
    }
}
