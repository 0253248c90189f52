use crate::{
    entities::{lot_balance, product},
    handlers::AppState,
    ApiResponse, ApiResult, ListQuery, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeUtc;
use serde::Serialize;
use utoipa::ToSchema;

/// Router for inventory read endpoints
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{code}", get(get_product))
        .route("/products/{code}/lots", get(list_lot_balances))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSummary {
    pub code: String,
    pub name: String,
    pub stock: Decimal,
    pub unit_cost: Decimal,
    pub sale_price: Decimal,
    pub updated_at: DateTimeUtc,
}

impl From<product::Model> for ProductSummary {
    fn from(model: product::Model) -> Self {
        Self {
            code: model.code,
            name: model.name,
            stock: model.stock,
            unit_cost: model.unit_cost,
            sale_price: model.sale_price,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LotBalanceView {
    pub lot_code: String,
    pub warehouse_id: i32,
    pub balance: Decimal,
    pub updated_at: DateTimeUtc,
}

impl From<lot_balance::Model> for LotBalanceView {
    fn from(model: lot_balance::Model) -> Self {
        Self {
            lot_code: model.lot_code,
            warehouse_id: model.warehouse_id,
            balance: model.balance,
            updated_at: model.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/products",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("search" = Option<String>, Query, description = "Term matched against product code and name")
    ),
    responses(
        (status = 200, description = "Products listed", body = crate::ApiResponse<crate::PaginatedResponse<ProductSummary>>),
        (status = 400, description = "Invalid pagination", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<ProductSummary>> {
    let page = query.page;
    let limit = query.limit.clamp(1, state.config.api_max_page_size);

    let (products, total) = state
        .inventory_service()
        .list_products(query.search, page, limit)
        .await?;

    let items = products.into_iter().map(ProductSummary::from).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/products/{code}",
    params(
        ("code" = String, Path, description = "Product code")
    ),
    responses(
        (status = 200, description = "Product fetched", body = crate::ApiResponse<ProductSummary>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<ProductSummary> {
    let product = state.inventory_service().get_product(&code).await?;
    Ok(Json(ApiResponse::success(ProductSummary::from(product))))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/products/{code}/lots",
    params(
        ("code" = String, Path, description = "Product code")
    ),
    responses(
        (status = 200, description = "Lot balances in the exchange warehouse", body = crate::ApiResponse<Vec<LotBalanceView>>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_lot_balances(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Vec<LotBalanceView>> {
    let balances = state.inventory_service().lot_balances(&code).await?;
    let views = balances.into_iter().map(LotBalanceView::from).collect();
    Ok(Json(ApiResponse::success(views)))
}
