use crate::{
    entities::return_guide_line::{self, MatchScope},
    handlers::AppState,
    ApiResponse, ApiResult, PaginatedResponse,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Router for supplier return endpoints
pub fn return_routes() -> Router<AppState> {
    Router::new().route("/pending", get(list_pending_returns))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PendingReturnLine {
    pub id: i64,
    pub return_guide_number: String,
    pub supplier_id: String,
    pub product_code: String,
    pub lot_code: String,
    pub quantity: Decimal,
    pub reference: String,
    pub doc_type: i32,
    #[schema(value_type = String, example = "exact")]
    pub match_scope: MatchScope,
}

impl From<return_guide_line::Model> for PendingReturnLine {
    fn from(model: return_guide_line::Model) -> Self {
        Self {
            id: model.id,
            return_guide_number: model.return_guide_number,
            supplier_id: model.supplier_id,
            product_code: model.product_code,
            lot_code: model.lot_code,
            quantity: model.quantity,
            reference: model.reference,
            doc_type: model.doc_type,
            match_scope: model.match_scope,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PendingReturnsQuery {
    /// Restrict to one supplier's pending lines.
    pub supplier_id: Option<String>,
    /// Page number, 1-indexed.
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/returns/pending",
    params(PendingReturnsQuery),
    responses(
        (status = 200, description = "Pending return lines listed", body = crate::ApiResponse<crate::PaginatedResponse<PendingReturnLine>>),
        (status = 400, description = "Invalid pagination", body = crate::errors::ErrorResponse)
    ),
    tag = "returns"
)]
pub async fn list_pending_returns(
    State(state): State<AppState>,
    Query(query): Query<PendingReturnsQuery>,
) -> ApiResult<PaginatedResponse<PendingReturnLine>> {
    let page = query.page.unwrap_or(1);
    let limit = query
        .limit
        .unwrap_or(state.config.api_default_page_size)
        .clamp(1, state.config.api_max_page_size);

    let (lines, total) = state
        .exchange_service()
        .pending_returns(query.supplier_id, page, limit)
        .await?;

    let items = lines.into_iter().map(PendingReturnLine::from).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}
