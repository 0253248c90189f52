use crate::{
    entities::{
        ledger_entry::{self, LedgerClass, MovementDirection},
        lot_balance::{self, Entity as LotBalance},
        product::{self, Entity as Product},
    },
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

/// Balances after one applied stock mutation. Carries the refreshed product
/// row so callers can snapshot cost, price and stock-after into the ledger.
#[derive(Debug, Clone)]
pub struct AppliedStock {
    pub product: product::Model,
    pub lot_balance: lot_balance::Model,
}

/// One ledger line to append for a document.
#[derive(Debug, Clone, Copy)]
pub struct LedgerLine<'a> {
    pub document_number: &'a str,
    pub class: LedgerClass,
    pub direction: MovementDirection,
    pub warehouse_id: i32,
    pub lot_code: &'a str,
    pub quantity: Decimal,
}

fn require_positive(quantity: Decimal) -> Result<(), ServiceError> {
    if quantity <= Decimal::ZERO {
        return Err(ServiceError::InvalidQuantity(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    Ok(())
}

async fn load_product_for_update(
    txn: &DatabaseTransaction,
    product_code: &str,
) -> Result<product::Model, ServiceError> {
    // SELECT .. FOR UPDATE; SQLite ignores the clause and serializes through
    // its writer lock instead.
    Product::find_by_id(product_code.to_string())
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::ProductNotFound(product_code.to_string()))
}

fn lot_filter(
    product_code: &str,
    warehouse_id: i32,
    lot_code: &str,
) -> sea_orm::Select<LotBalance> {
    LotBalance::find()
        .filter(lot_balance::Column::ProductCode.eq(product_code))
        .filter(lot_balance::Column::WarehouseId.eq(warehouse_id))
        .filter(lot_balance::Column::LotCode.eq(lot_code))
}

/// Removes `quantity` of a product lot from a warehouse.
///
/// Both the global product stock and the per-lot balance must cover the
/// quantity before either row is touched; a shortfall on either level fails
/// the whole call without writing anything.
pub async fn apply_outbound(
    txn: &DatabaseTransaction,
    product_code: &str,
    lot_code: &str,
    warehouse_id: i32,
    quantity: Decimal,
) -> Result<AppliedStock, ServiceError> {
    require_positive(quantity)?;

    let product = load_product_for_update(txn, product_code).await?;

    if product.stock < quantity {
        return Err(ServiceError::InsufficientStock {
            product_code: product_code.to_string(),
            available: product.stock,
            requested: quantity,
        });
    }

    let lot = lot_filter(product_code, warehouse_id, lot_code)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::LotBalanceNotFound {
            product_code: product_code.to_string(),
            lot_code: lot_code.to_string(),
            warehouse_id,
        })?;

    if lot.balance < quantity {
        return Err(ServiceError::InsufficientLotBalance {
            product_code: product_code.to_string(),
            lot_code: lot_code.to_string(),
            available: lot.balance,
            requested: quantity,
        });
    }

    let mut active_product: product::ActiveModel = product.clone().into();
    active_product.stock = Set(product.stock - quantity);
    active_product.updated_at = Set(Utc::now());
    let product = active_product
        .update(txn)
        .await
        .map_err(ServiceError::db_error)?;

    let mut active_lot: lot_balance::ActiveModel = lot.clone().into();
    active_lot.balance = Set(lot.balance - quantity);
    active_lot.updated_at = Set(Utc::now());
    let lot_balance = active_lot
        .update(txn)
        .await
        .map_err(ServiceError::db_error)?;

    Ok(AppliedStock {
        product,
        lot_balance,
    })
}

/// Adds `quantity` of a product lot back into a warehouse.
///
/// The product must exist; a missing lot-balance row is created on the fly
/// so reversals can restore lots whose rows never existed in that warehouse.
pub async fn apply_inbound(
    txn: &DatabaseTransaction,
    product_code: &str,
    lot_code: &str,
    warehouse_id: i32,
    quantity: Decimal,
) -> Result<AppliedStock, ServiceError> {
    require_positive(quantity)?;

    let product = load_product_for_update(txn, product_code).await?;

    let mut active_product: product::ActiveModel = product.clone().into();
    active_product.stock = Set(product.stock + quantity);
    active_product.updated_at = Set(Utc::now());
    let product = active_product
        .update(txn)
        .await
        .map_err(ServiceError::db_error)?;

    let existing = lot_filter(product_code, warehouse_id, lot_code)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(ServiceError::db_error)?;

    let lot_balance = match existing {
        Some(lot) => {
            let mut active_lot: lot_balance::ActiveModel = lot.clone().into();
            active_lot.balance = Set(lot.balance + quantity);
            active_lot.updated_at = Set(Utc::now());
            active_lot.update(txn).await.map_err(ServiceError::db_error)?
        }
        None => {
            let new_lot = lot_balance::ActiveModel {
                product_code: Set(product_code.to_string()),
                warehouse_id: Set(warehouse_id),
                lot_code: Set(lot_code.to_string()),
                balance: Set(quantity),
                updated_at: Set(Utc::now()),
                ..Default::default()
            };
            new_lot.insert(txn).await.map_err(ServiceError::db_error)?
        }
    };

    Ok(AppliedStock {
        product,
        lot_balance,
    })
}

/// Overwrites the product's cost and/or price when a movement carries new
/// ones. Returns the row unchanged when neither is given, so the ledger
/// snapshot downstream always reflects what was actually in effect.
pub async fn update_product_pricing(
    txn: &DatabaseTransaction,
    product: product::Model,
    unit_cost: Option<Decimal>,
    sale_price: Option<Decimal>,
) -> Result<product::Model, ServiceError> {
    if unit_cost.is_none() && sale_price.is_none() {
        return Ok(product);
    }

    let mut active: product::ActiveModel = product.into();
    if let Some(cost) = unit_cost {
        active.unit_cost = Set(cost);
    }
    if let Some(price) = sale_price {
        active.sale_price = Set(price);
    }
    active.updated_at = Set(Utc::now());

    active.update(txn).await.map_err(ServiceError::db_error)
}

/// Appends one immutable ledger entry, snapshotting the product's cost,
/// price and resulting stock at posting time.
pub async fn append_ledger_entry(
    txn: &DatabaseTransaction,
    product: &product::Model,
    line: LedgerLine<'_>,
) -> Result<ledger_entry::Model, ServiceError> {
    let entry = ledger_entry::ActiveModel {
        id: Set(Uuid::new_v4()),
        document_number: Set(line.document_number.to_string()),
        class: Set(line.class),
        direction: Set(line.direction),
        product_code: Set(product.code.clone()),
        lot_code: Set(line.lot_code.to_string()),
        warehouse_id: Set(line.warehouse_id),
        quantity: Set(line.quantity),
        unit_cost: Set(product.unit_cost),
        unit_price: Set(product.sale_price),
        stock_after: Set(product.stock),
        occurred_at: Set(Utc::now()),
    };

    entry.insert(txn).await.map_err(ServiceError::db_error)
}
