use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Exchange-guide header. The document that accompanies expired or damaged
/// product sent back to a supplier for exchange.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exchange_guides")]
pub struct Model {
    /// Formatted document number, e.g. "FF01-000123".
    #[sea_orm(primary_key, auto_increment = false)]
    pub number: String,
    pub guide_date: Date,
    pub supplier_id: String,
    pub transport_company: String,
    pub transport_tax_id: String,
    pub vehicle_plate: String,
    /// Where the carrier hands the goods over.
    pub arrival_point: String,
    pub addressee: String,
    /// Logical deletion flag set by a reversal. Deleted guides keep their
    /// lines and ledger history.
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::exchange_guide_line::Entity")]
    Lines,
}

impl Related<super::exchange_guide_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
