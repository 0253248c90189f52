use crate::{entities::dispatch_guide, handlers::AppState, ApiResponse, ApiResult};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Router for dispatch guide endpoints
pub fn dispatch_guide_routes() -> Router<AppState> {
    Router::new().route("/{number}", get(get_dispatch_guide))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DispatchGuideView {
    pub number: String,
    /// Number of the document the dispatch covers, the exchange guide for
    /// guides issued by this service.
    pub sale_document: String,
    pub doc_type: i32,
    pub guide_date: NaiveDate,
    pub transport_company: String,
    pub transport_tax_id: String,
    pub vehicle_plate: String,
    pub destination: String,
    pub gross_weight_kg: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl From<dispatch_guide::Model> for DispatchGuideView {
    fn from(model: dispatch_guide::Model) -> Self {
        Self {
            number: model.number,
            sale_document: model.sale_document,
            doc_type: model.doc_type,
            guide_date: model.guide_date,
            transport_company: model.transport_company,
            transport_tax_id: model.transport_tax_id,
            vehicle_plate: model.vehicle_plate,
            destination: model.destination,
            gross_weight_kg: model.gross_weight_kg,
            created_at: model.created_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/dispatch-guides/{number}",
    params(
        ("number" = String, Path, description = "Dispatch guide number")
    ),
    responses(
        (status = 200, description = "Dispatch guide fetched", body = crate::ApiResponse<DispatchGuideView>),
        (status = 404, description = "Dispatch guide not found", body = crate::errors::ErrorResponse)
    ),
    tag = "dispatch-guides"
)]
pub async fn get_dispatch_guide(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult<DispatchGuideView> {
    let guide = state.exchange_service().get_dispatch_guide(&number).await?;
    Ok(Json(ApiResponse::success(DispatchGuideView::from(guide))))
}
