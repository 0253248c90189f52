use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Single row per document family holding the last allocated number. Readers
/// peek the next value without writing; the row is only advanced after the
/// document commit succeeds.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sequence_counters")]
pub struct Model {
    /// Counter family, e.g. "exchange_guide".
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    /// Last value handed out, in the family's document format.
    pub value: String,
    pub description: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
