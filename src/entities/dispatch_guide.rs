use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Dispatch-guide header recorded alongside an exchange so the shipment can
/// travel. Survives reversal of its exchange guide; only the counter is
/// resynced.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dispatch_guides")]
pub struct Model {
    /// Formatted document number, e.g. "T002-000123".
    #[sea_orm(primary_key, auto_increment = false)]
    pub number: String,
    /// Sale or exchange document this dispatch covers.
    pub sale_document: String,
    pub doc_type: i32,
    pub guide_date: Date,
    pub transport_company: String,
    pub transport_tax_id: String,
    pub vehicle_plate: String,
    pub destination: String,
    pub gross_weight_kg: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
