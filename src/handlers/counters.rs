use crate::{
    entities::sequence_counter,
    handlers::AppState,
    services::{counters::ResyncOutcome, sequences},
    ApiResponse, ApiResult,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Router for sequence counter endpoints
pub fn counter_routes() -> Router<AppState> {
    Router::new()
        .route("/dispatch/resync", post(resync_dispatch_counter))
        .route("/{code}", get(get_counter))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CounterView {
    pub code: String,
    /// Last number committed under this counter.
    pub value: String,
    /// Number the next registration would take.
    pub next_value: String,
    pub description: String,
    pub updated_at: DateTimeUtc,
}

impl From<sequence_counter::Model> for CounterView {
    fn from(model: sequence_counter::Model) -> Self {
        let next_value = sequences::peek_next(&model.value);
        Self {
            code: model.code,
            value: model.value,
            next_value,
            description: model.description,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ResyncRequest {
    /// Overrides the configured series infix, e.g. "T002".
    pub number_infix: Option<String>,
    /// Overrides the configured cutoff date for candidate guides.
    pub min_date: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/v1/counters/{code}",
    params(
        ("code" = String, Path, description = "Counter code, e.g. exchange_guide")
    ),
    responses(
        (status = 200, description = "Counter fetched", body = crate::ApiResponse<CounterView>),
        (status = 500, description = "Counter missing", body = crate::errors::ErrorResponse)
    ),
    tag = "counters"
)]
pub async fn get_counter(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<CounterView> {
    let counter = state.counter_service().get_counter(&code).await?;
    Ok(Json(ApiResponse::success(CounterView::from(counter))))
}

#[utoipa::path(
    post,
    path = "/api/v1/counters/dispatch/resync",
    request_body = ResyncRequest,
    responses(
        (status = 200, description = "Dispatch counter resynced", body = crate::ApiResponse<ResyncOutcome>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "counters"
)]
pub async fn resync_dispatch_counter(
    State(state): State<AppState>,
    Json(payload): Json<ResyncRequest>,
) -> ApiResult<ResyncOutcome> {
    let outcome = state
        .counter_service()
        .resync_dispatch(payload.number_infix, payload.min_date)
        .await?;
    Ok(Json(ApiResponse::success(outcome)))
}
