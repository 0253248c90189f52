use crate::{
    entities::{ledger_entry::MovementDirection, movement, movement_line},
    handlers::AppState,
    services::movements::{NewMovement, RegisteredMovement},
    ApiResponse, ApiResult,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Router for warehouse movement endpoints
pub fn movement_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register_movement))
        .route("/{number}", get(get_movement))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovementLineView {
    pub id: i64,
    pub product_code: String,
    pub lot_code: String,
    pub quantity: Decimal,
    pub unit_cost: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

impl From<movement_line::Model> for MovementLineView {
    fn from(model: movement_line::Model) -> Self {
        Self {
            id: model.id,
            product_code: model.product_code,
            lot_code: model.lot_code,
            quantity: model.quantity,
            unit_cost: model.unit_cost,
            unit_price: model.unit_price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovementResponse {
    pub number: String,
    pub movement_date: NaiveDate,
    pub warehouse_id: i32,
    #[schema(value_type = String, example = "outbound")]
    pub direction: MovementDirection,
    pub concept: String,
    pub reference: Option<String>,
    pub spoilage: bool,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<MovementLineView>,
}

impl MovementResponse {
    fn from_parts(header: movement::Model, lines: Vec<movement_line::Model>) -> Self {
        Self {
            number: header.number,
            movement_date: header.movement_date,
            warehouse_id: header.warehouse_id,
            direction: header.direction,
            concept: header.concept,
            reference: header.reference,
            spoilage: header.spoilage,
            created_at: header.created_at,
            lines: lines.into_iter().map(MovementLineView::from).collect(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/movements",
    request_body = NewMovement,
    responses(
        (status = 200, description = "Movement registered", body = crate::ApiResponse<RegisteredMovement>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown product or lot", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock or lot balance", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn register_movement(
    State(state): State<AppState>,
    Json(payload): Json<NewMovement>,
) -> ApiResult<RegisteredMovement> {
    let registered = state.movement_service().register_movement(payload).await?;
    Ok(Json(ApiResponse::success(registered)))
}

#[utoipa::path(
    get,
    path = "/api/v1/movements/{number}",
    params(
        ("number" = String, Path, description = "Movement number")
    ),
    responses(
        (status = 200, description = "Movement fetched", body = crate::ApiResponse<MovementResponse>),
        (status = 404, description = "Movement not found", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn get_movement(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult<MovementResponse> {
    let detail = state.movement_service().get_movement(&number).await?;
    Ok(Json(ApiResponse::success(MovementResponse::from_parts(
        detail.header,
        detail.lines,
    ))))
}
