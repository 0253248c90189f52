use crate::{
    entities::{exchange_guide, exchange_guide_line},
    handlers::AppState,
    services::exchanges::{
        ExchangeGuideFilter, NewExchangeGuide, NextNumbers, RegisteredExchange, ReversedExchange,
    },
    ApiResponse, ApiResult, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Router for exchange-guide endpoints
pub fn exchange_guide_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register_exchange))
        .route("/", get(list_exchange_guides))
        .route("/next-numbers", get(next_numbers))
        .route("/{number}", get(get_exchange_guide))
        .route("/{number}", delete(reverse_exchange))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExchangeGuideSummary {
    pub number: String,
    pub guide_date: NaiveDate,
    pub supplier_id: String,
    pub transport_company: String,
    pub arrival_point: String,
    pub addressee: String,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<exchange_guide::Model> for ExchangeGuideSummary {
    fn from(model: exchange_guide::Model) -> Self {
        Self {
            number: model.number,
            guide_date: model.guide_date,
            supplier_id: model.supplier_id,
            transport_company: model.transport_company,
            arrival_point: model.arrival_point,
            addressee: model.addressee,
            deleted: model.deleted,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExchangeLineView {
    pub id: i64,
    pub product_code: String,
    pub lot_code: String,
    pub expiry: Option<NaiveDate>,
    pub quantity: Decimal,
    pub return_guide_number: String,
    pub reference: String,
    pub doc_type: i32,
}

impl From<exchange_guide_line::Model> for ExchangeLineView {
    fn from(model: exchange_guide_line::Model) -> Self {
        Self {
            id: model.id,
            product_code: model.product_code,
            lot_code: model.lot_code,
            expiry: model.expiry,
            quantity: model.quantity,
            return_guide_number: model.return_guide_number,
            reference: model.reference,
            doc_type: model.doc_type,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExchangeGuideResponse {
    #[serde(flatten)]
    pub header: ExchangeGuideSummary,
    pub lines: Vec<ExchangeLineView>,
}

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExchangeGuideListQuery {
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub limit: Option<u64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub supplier_id: Option<String>,
    pub number_prefix: Option<String>,
    /// Include logically deleted guides
    pub include_deleted: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/v1/exchange-guides",
    request_body = NewExchangeGuide,
    responses(
        (status = 200, description = "Exchange guide registered", body = crate::ApiResponse<RegisteredExchange>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown product or lot", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock or lot balance", body = crate::errors::ErrorResponse)
    ),
    tag = "exchange-guides"
)]
pub async fn register_exchange(
    State(state): State<AppState>,
    Json(payload): Json<NewExchangeGuide>,
) -> ApiResult<RegisteredExchange> {
    let registered = state.exchange_service().register_exchange(payload).await?;
    Ok(Json(ApiResponse::success(registered)))
}

#[utoipa::path(
    get,
    path = "/api/v1/exchange-guides",
    params(ExchangeGuideListQuery),
    responses(
        (status = 200, description = "Exchange guides listed", body = crate::ApiResponse<crate::PaginatedResponse<ExchangeGuideSummary>>)
    ),
    tag = "exchange-guides"
)]
pub async fn list_exchange_guides(
    State(state): State<AppState>,
    Query(query): Query<ExchangeGuideListQuery>,
) -> ApiResult<PaginatedResponse<ExchangeGuideSummary>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(state.config.api_default_page_size)
        .clamp(1, state.config.api_max_page_size);

    let filter = ExchangeGuideFilter {
        date_from: query.date_from,
        date_to: query.date_to,
        supplier_id: query.supplier_id,
        number_prefix: query.number_prefix,
        include_deleted: query.include_deleted.unwrap_or(false),
    };

    let (guides, total) = state
        .exchange_service()
        .list_guides(filter, page, limit)
        .await?;

    let items: Vec<ExchangeGuideSummary> = guides
        .into_iter()
        .map(ExchangeGuideSummary::from)
        .collect();

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/exchange-guides/next-numbers",
    responses(
        (status = 200, description = "Next document numbers", body = crate::ApiResponse<NextNumbers>)
    ),
    tag = "exchange-guides"
)]
pub async fn next_numbers(State(state): State<AppState>) -> ApiResult<NextNumbers> {
    let numbers = state.exchange_service().next_numbers().await?;
    Ok(Json(ApiResponse::success(numbers)))
}

#[utoipa::path(
    get,
    path = "/api/v1/exchange-guides/{number}",
    params(
        ("number" = String, Path, description = "Exchange guide number")
    ),
    responses(
        (status = 200, description = "Exchange guide fetched", body = crate::ApiResponse<ExchangeGuideResponse>),
        (status = 404, description = "Exchange guide not found", body = crate::errors::ErrorResponse)
    ),
    tag = "exchange-guides"
)]
pub async fn get_exchange_guide(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult<ExchangeGuideResponse> {
    let detail = state.exchange_service().get_guide(&number).await?;

    Ok(Json(ApiResponse::success(ExchangeGuideResponse {
        header: detail.header.into(),
        lines: detail.lines.into_iter().map(ExchangeLineView::from).collect(),
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/exchange-guides/{number}",
    params(
        ("number" = String, Path, description = "Exchange guide number")
    ),
    responses(
        (status = 200, description = "Exchange guide reversed", body = crate::ApiResponse<ReversedExchange>),
        (status = 404, description = "Exchange guide not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Guide already reversed", body = crate::errors::ErrorResponse)
    ),
    tag = "exchange-guides"
)]
pub async fn reverse_exchange(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult<ReversedExchange> {
    let reversed = state.exchange_service().reverse_exchange(&number).await?;
    Ok(Json(ApiResponse::success(reversed)))
}
