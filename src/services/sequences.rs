use crate::{
    entities::{
        dispatch_guide::{self, Entity as DispatchGuide},
        sequence_counter::{self, Entity as SequenceCounter},
    },
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::{debug, info};

/// Counter code for supplier exchange guide numbers (`FF01-NNNNNN`).
pub const EXCHANGE_GUIDE: &str = "exchange_guide";
/// Counter code for dispatch guide numbers (`T002-NNNNNN`).
pub const DISPATCH_GUIDE: &str = "dispatch_guide";
/// Counter code for warehouse movement numbers (`MV01-NNNNNN`).
pub const WAREHOUSE_MOVEMENT: &str = "warehouse_movement";

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z0-9]+)-(\d+)$").unwrap());

/// Computes the next document number from a stored counter value.
///
/// Counter values look like `FF01-000123`: an alphanumeric series prefix, a
/// dash, and a zero-padded sequence. The next number keeps the prefix and
/// pads the incremented sequence to six digits. A value that does not match
/// the pattern comes back unchanged, so a hand-edited counter never blocks
/// registration.
pub fn peek_next(current: &str) -> String {
    let Some(caps) = NUMBER_PATTERN.captures(current) else {
        return current.to_string();
    };
    let Ok(sequence) = caps[2].parse::<u64>() else {
        return current.to_string();
    };
    let Some(next) = sequence.checked_add(1) else {
        return current.to_string();
    };
    format!("{}-{:06}", &caps[1], next)
}

/// Reads a counter without locking it, for previews and admin reads.
pub async fn read_counter<C>(db: &C, code: &str) -> Result<sequence_counter::Model, ServiceError>
where
    C: ConnectionTrait,
{
    SequenceCounter::find_by_id(code)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::CounterNotFound(code.to_string()))
}

/// Loads a counter row under an exclusive row lock. Postgres takes
/// `SELECT .. FOR UPDATE`; SQLite serializes through its writer lock.
pub async fn read_counter_for_update(
    txn: &DatabaseTransaction,
    code: &str,
) -> Result<sequence_counter::Model, ServiceError> {
    SequenceCounter::find_by_id(code)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::CounterNotFound(code.to_string()))
}

/// Locks a counter and returns the next number in its series without
/// advancing it. The caller commits the advance in the same transaction
/// once every other write has succeeded.
pub async fn peek_next_number(
    txn: &DatabaseTransaction,
    code: &str,
) -> Result<String, ServiceError> {
    let counter = read_counter_for_update(txn, code).await?;
    Ok(peek_next(&counter.value))
}

/// Overwrites a counter with the number just consumed. Called exactly once
/// per registered document, as the last write of the transaction.
pub async fn commit_advance(
    txn: &DatabaseTransaction,
    code: &str,
    number: &str,
) -> Result<(), ServiceError> {
    let counter = SequenceCounter::find_by_id(code)
        .one(txn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::CounterNotFound(code.to_string()))?;

    let mut active: sequence_counter::ActiveModel = counter.into();
    active.value = Set(number.to_string());
    active.updated_at = Set(Utc::now());
    active.update(txn).await.map_err(ServiceError::db_error)?;

    Ok(())
}

/// Rewinds the dispatch counter to the newest surviving dispatch guide.
///
/// Reversal removes nothing from the dispatch store, so the counter is
/// re-derived from what remains. Only guides in the current numbering
/// series (number containing `infix`) dated on or after `min_date` are
/// considered; when none qualify the counter is left untouched.
pub async fn resync_dispatch_counter(
    txn: &DatabaseTransaction,
    infix: &str,
    min_date: NaiveDate,
) -> Result<Option<String>, ServiceError> {
    let newest = DispatchGuide::find()
        .filter(dispatch_guide::Column::Number.contains(infix))
        .filter(dispatch_guide::Column::GuideDate.gte(min_date))
        .order_by_desc(dispatch_guide::Column::Number)
        .one(txn)
        .await
        .map_err(ServiceError::db_error)?;

    match newest {
        Some(guide) => {
            info!(number = %guide.number, "Dispatch counter resynced to newest surviving guide");
            commit_advance(txn, DISPATCH_GUIDE, &guide.number).await?;
            Ok(Some(guide.number))
        }
        None => {
            debug!(infix, "No dispatch guide qualifies for resync; counter unchanged");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn increments_and_pads() {
        assert_eq!(peek_next("FF01-000001"), "FF01-000002");
        assert_eq!(peek_next("T002-000009"), "T002-000010");
        assert_eq!(peek_next("MV01-000000"), "MV01-000001");
    }

    #[test]
    fn short_sequences_pad_to_six_digits() {
        assert_eq!(peek_next("T002-1"), "T002-000002");
        assert_eq!(peek_next("FF01-99"), "FF01-000100");
    }

    #[test]
    fn long_sequences_keep_all_digits() {
        assert_eq!(peek_next("MV01-999999"), "MV01-1000000");
    }

    #[test]
    fn unparseable_values_pass_through() {
        assert_eq!(peek_next("XYZ"), "XYZ");
        assert_eq!(peek_next(""), "");
        assert_eq!(peek_next("FF01-"), "FF01-");
        assert_eq!(peek_next("FF01-12AB"), "FF01-12AB");
        assert_eq!(peek_next("-000001"), "-000001");
        assert_eq!(peek_next("ff01-000001"), "ff01-000001");
    }

    proptest! {
        #[test]
        fn well_formed_values_advance_by_exactly_one(
            prefix in "[A-Z]{2}[0-9]{2}",
            sequence in 0u64..999_999,
        ) {
            let current = format!("{}-{:06}", prefix, sequence);
            let expected = format!("{}-{:06}", prefix, sequence + 1);
            prop_assert_eq!(peek_next(&current), expected);
        }

        #[test]
        fn next_value_stays_well_formed(
            prefix in "[A-Z]{2}[0-9]{2}",
            sequence in 0u64..999_999,
        ) {
            let next = peek_next(&format!("{}-{:06}", prefix, sequence));
            prop_assert!(NUMBER_PATTERN.is_match(&next));
        }
    }
}
