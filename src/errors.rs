use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use sea_orm::error::{ConnAcquireErr, DbErr};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

fn current_request_id() -> Option<String> {
    crate::http::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Not Found",
    "message": "Exchange guide FF01-000123 not found",
    "details": null,
    "request_id": "req-abc123xyz",
    "timestamp": "2024-12-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Unprocessable Entity")
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "Exchange guide FF01-000123 not found")]
    pub message: String,
    /// Additional error details (validation errors, field names)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Field 'quantity' must be positive")]
    pub details: Option<String>,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "req-abc123xyz")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when error occurred
    #[schema(example = "2024-12-09T10:30:00.000Z")]
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[serde(skip)] sea_orm::error::DbErr),

    #[error("Product {0} not found")]
    ProductNotFound(String),

    #[error("No balance for product {product_code} lot {lot_code} in warehouse {warehouse_id}")]
    LotBalanceNotFound {
        product_code: String,
        lot_code: String,
        warehouse_id: i32,
    },

    #[error("Insufficient stock for product {product_code}: available {available}, requested {requested}")]
    InsufficientStock {
        product_code: String,
        available: Decimal,
        requested: Decimal,
    },

    #[error("Insufficient balance for product {product_code} lot {lot_code}: available {available}, requested {requested}")]
    InsufficientLotBalance {
        product_code: String,
        lot_code: String,
        available: Decimal,
        requested: Decimal,
    },

    #[error("Document {0} not found")]
    DocumentNotFound(String),

    #[error("Document {0} is already deleted")]
    AlreadyDeleted(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Sequence counter {0} missing")]
    CounterNotFound(String),

    #[error("Storage conflict: {0}")]
    StorageConflict(String),

    #[error("Storage timeout: {0}")]
    StorageTimeout(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Internal server error")]
    InternalServerError,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

// Routed through `db_error` so transaction begin/commit failures get the
// same timeout/contention classification as query errors.
impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        ServiceError::db_error(err)
    }
}

pub trait IntoDbErr {
    fn into_db_err(self) -> DbErr;
}

impl IntoDbErr for DbErr {
    fn into_db_err(self) -> DbErr {
        self
    }
}

impl IntoDbErr for String {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self)
    }
}

impl IntoDbErr for &str {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self.to_string())
    }
}

impl ServiceError {
    /// Generic constructor that normalizes any supported database error input.
    ///
    /// Pool-acquire timeouts and lock contention get their own variants so
    /// callers see a retryable status instead of a generic 500.
    pub fn db_error<E: IntoDbErr>(error: E) -> Self {
        match error.into_db_err() {
            DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => {
                ServiceError::StorageTimeout("connection acquire timed out".to_string())
            }
            err => {
                let text = err.to_string();
                if text.contains("database is locked")
                    || text.contains("deadlock")
                    || text.contains("could not serialize")
                {
                    ServiceError::StorageConflict(text)
                } else {
                    ServiceError::DatabaseError(err)
                }
            }
        }
    }

    /// Convenience constructor for wrapping string-based database errors.
    pub fn database_error_message(message: impl Into<String>) -> Self {
        ServiceError::db_error(message.into())
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ProductNotFound(_)
            | Self::LotBalanceNotFound { .. }
            | Self::DocumentNotFound(_)
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientStock { .. } | Self::InsufficientLotBalance { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::AlreadyDeleted(_) | Self::StorageConflict(_) => StatusCode::CONFLICT,
            Self::InvalidQuantity(_)
            | Self::ValidationError(_)
            | Self::InvalidOperation(_)
            | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::StorageTimeout(_) | Self::ServiceUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::CounterNotFound(_)
            | Self::EventError(_)
            | Self::InternalError(_)
            | Self::InternalServerError
            | Self::MigrationError(_)
            | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            // For internal errors, return generic messages to avoid leaking details
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::EventError(_)
            | Self::InternalError(_)
            | Self::MigrationError(_)
            | Self::Other(_) => "Internal server error".to_string(),
            Self::InternalServerError => "Internal server error".to_string(),
            Self::StorageTimeout(_) => "Storage temporarily unavailable".to_string(),
            Self::ServiceUnavailable(msg) => format!("Service unavailable: {}", msg),
            // For user-facing errors, return the actual message
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = self.response_message();

        let request_id = current_request_id();
        // Build standardized error response
        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: error_message,
            details: None,
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
