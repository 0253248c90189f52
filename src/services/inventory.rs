use crate::{
    db::DatabaseAccess,
    entities::{
        lot_balance::{self, Entity as LotBalance},
        product::{self, Entity as Product},
    },
    errors::ServiceError,
    services::exchanges::validate_paging,
};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;

/// Read-only views over products and their lot balances.
pub struct InventoryService {
    db: Arc<DatabaseAccess>,
    exchange_warehouse_id: i32,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseAccess>, exchange_warehouse_id: i32) -> Self {
        Self {
            db,
            exchange_warehouse_id,
        }
    }

    pub async fn get_product(&self, code: &str) -> Result<product::Model, ServiceError> {
        Product::find_by_id(code.trim())
            .one(self.db.get_pool())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::ProductNotFound(code.to_string()))
    }

    pub async fn list_products(
        &self,
        search: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        validate_paging(page, limit)?;

        let db = self.db.get_pool();
        let mut query = Product::find();

        if let Some(term) = search {
            let term = term.trim().to_string();
            if !term.is_empty() {
                query = query.filter(
                    Condition::any()
                        .add(product::Column::Code.contains(&term))
                        .add(product::Column::Name.contains(&term)),
                );
            }
        }

        let paginator = query.order_by_asc(product::Column::Code).paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let products = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((products, total))
    }

    /// Per-lot balances of a product in the exchange warehouse, the picker
    /// data for building guide lines. Zeroed lots are included; the caller
    /// decides what to show.
    pub async fn lot_balances(
        &self,
        product_code: &str,
    ) -> Result<Vec<lot_balance::Model>, ServiceError> {
        let db = self.db.get_pool();

        // Unknown product is an error here, not an empty list.
        Product::find_by_id(product_code.trim())
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::ProductNotFound(product_code.to_string()))?;

        LotBalance::find()
            .filter(lot_balance::Column::ProductCode.eq(product_code.trim()))
            .filter(lot_balance::Column::WarehouseId.eq(self.exchange_warehouse_id))
            .order_by_asc(lot_balance::Column::LotCode)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }
}
