use crate::{
    db::DbPool,
    entities::audit_trail::{self, Entity as AuditTrail},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// Appends one audit row inside the caller's transaction.
pub async fn record(
    txn: &DatabaseTransaction,
    action: &str,
    document_number: &str,
    detail: String,
) -> Result<(), ServiceError> {
    audit_trail::ActiveModel {
        id: Set(Uuid::new_v4()),
        occurred_at: Set(Utc::now()),
        action: Set(action.to_string()),
        document_number: Set(document_number.to_string()),
        detail: Set(detail),
    }
    .insert(txn)
    .await
    .map_err(ServiceError::db_error)?;

    Ok(())
}

/// All audit rows for one document, newest first.
pub async fn for_document(
    db: &DbPool,
    document_number: &str,
) -> Result<Vec<audit_trail::Model>, ServiceError> {
    AuditTrail::find()
        .filter(audit_trail::Column::DocumentNumber.eq(document_number))
        .order_by_desc(audit_trail::Column::OccurredAt)
        .all(db)
        .await
        .map_err(ServiceError::db_error)
}
