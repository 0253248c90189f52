use crate::{entities::audit_trail, handlers::AppState, services::audit, ApiResponse, ApiResult};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Router for audit trail endpoints
pub fn audit_routes() -> Router<AppState> {
    Router::new().route("/{document_number}", get(list_audit_entries))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditEntryView {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub action: String,
    pub document_number: String,
    pub detail: String,
}

impl From<audit_trail::Model> for AuditEntryView {
    fn from(model: audit_trail::Model) -> Self {
        Self {
            id: model.id,
            occurred_at: model.occurred_at,
            action: model.action,
            document_number: model.document_number,
            detail: model.detail,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/audit/{document_number}",
    params(
        ("document_number" = String, Path, description = "Document number the entries were recorded against")
    ),
    responses(
        (status = 200, description = "Audit entries for the document, newest first", body = crate::ApiResponse<Vec<AuditEntryView>>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "audit"
)]
pub async fn list_audit_entries(
    State(state): State<AppState>,
    Path(document_number): Path<String>,
) -> ApiResult<Vec<AuditEntryView>> {
    let entries = audit::for_document(state.db.get_pool(), &document_number).await?;
    let views = entries.into_iter().map(AuditEntryView::from).collect();
    Ok(Json(ApiResponse::success(views)))
}
