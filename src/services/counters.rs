use crate::{
    db::DatabaseAccess,
    entities::sequence_counter,
    errors::ServiceError,
    services::sequences,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Outcome of a dispatch-counter resync.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResyncOutcome {
    /// Value the counter was rewound to, absent when no guide qualified and
    /// the counter was left untouched.
    pub counter_value: Option<String>,
}

/// Admin reads and repairs over the sequence counters.
pub struct CounterService {
    db: Arc<DatabaseAccess>,
    dispatch_number_infix: String,
    dispatch_resync_min_date: NaiveDate,
}

impl CounterService {
    pub fn new(
        db: Arc<DatabaseAccess>,
        dispatch_number_infix: String,
        dispatch_resync_min_date: NaiveDate,
    ) -> Self {
        Self {
            db,
            dispatch_number_infix,
            dispatch_resync_min_date,
        }
    }

    pub async fn get_counter(&self, code: &str) -> Result<sequence_counter::Model, ServiceError> {
        sequences::read_counter(self.db.get_pool(), code).await
    }

    /// Re-derives the dispatch counter from the surviving dispatch guides.
    /// Filters default from configuration and can be overridden per call.
    #[instrument(skip(self))]
    pub async fn resync_dispatch(
        &self,
        infix_override: Option<String>,
        min_date_override: Option<NaiveDate>,
    ) -> Result<ResyncOutcome, ServiceError> {
        let infix = infix_override.unwrap_or_else(|| self.dispatch_number_infix.clone());
        let min_date = min_date_override.unwrap_or(self.dispatch_resync_min_date);

        let counter_value = self
            .db
            .transaction::<_, Option<String>, ServiceError>(move |txn| {
                Box::pin(
                    async move { sequences::resync_dispatch_counter(txn, &infix, min_date).await },
                )
            })
            .await?;

        Ok(ResyncOutcome { counter_value })
    }
}
