use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How exchange-guide lines are matched against this return line when the
/// processed flag is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum MatchScope {
    /// Document number, reference and product/lot must all line up.
    #[sea_orm(string_value = "exact")]
    Exact,
    /// Any line citing the same return-guide number counts.
    #[sea_orm(string_value = "document")]
    ByDocument,
    /// Any line for the same product and lot counts, regardless of document.
    #[sea_orm(string_value = "product_lot")]
    ByProductLot,
}

/// A quantity of returned product awaiting exchange. Each row is consumed by
/// exchange-guide lines until its `processed` flag flips.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "return_guide_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub return_guide_number: String,
    pub supplier_id: String,
    pub product_code: String,
    pub lot_code: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub quantity: Decimal,
    pub reference: String,
    /// Source document class (sales return, supplier return, internal).
    pub doc_type: i32,
    pub match_scope: MatchScope,
    /// True once matched exchange quantity covers `quantity`. Recomputed on
    /// every registration and reversal, never toggled blindly.
    pub processed: bool,
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
    /// Outstanding quantity given how much has already been exchanged.
    pub fn remaining(&self, consumed: Decimal) -> Decimal {
        self.quantity - consumed
    }
}
