use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::ledger_entry::MovementDirection;

/// Warehouse movement header. Covers spoilage write-offs, found stock and
/// other manual adjustments outside the exchange flow.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    /// Formatted document number, e.g. "MV01-000042".
    #[sea_orm(primary_key, auto_increment = false)]
    pub number: String,
    pub movement_date: Date,
    pub warehouse_id: i32,
    pub direction: MovementDirection,
    /// Operator-facing reason, e.g. "spoilage", "stock count".
    pub concept: String,
    pub reference: Option<String>,
    /// Spoilage movements are reported to the regulator separately.
    pub spoilage: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movement_line::Entity")]
    Lines,
}

impl Related<super::movement_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
