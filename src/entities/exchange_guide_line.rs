use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One product lot on an exchange guide, pointing back at the return-guide
/// line it settles.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exchange_guide_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub guide_number: String,
    pub product_code: String,
    pub lot_code: String,
    pub expiry: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub quantity: Decimal,
    /// Return guide this line draws down.
    pub return_guide_number: String,
    /// Free-form pointer into the supplier's paperwork.
    pub reference: String,
    /// Source document class of the matched return line.
    pub doc_type: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exchange_guide::Entity",
        from = "Column::GuideNumber",
        to = "super::exchange_guide::Column::Number"
    )]
    Guide,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductCode",
        to = "super::product::Column::Code"
    )]
    Product,
}

impl Related<super::exchange_guide::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guide.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
