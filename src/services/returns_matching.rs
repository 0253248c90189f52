use crate::{
    entities::{
        exchange_guide::{self, Entity as ExchangeGuide},
        exchange_guide_line::{self, Entity as ExchangeGuideLine},
        return_guide_line::{self, Entity as ReturnGuideLine, MatchScope},
    },
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set};
use std::collections::HashSet;
use tracing::debug;

/// A return line is settled once exchanged quantity covers its original
/// quantity.
pub fn is_settled(original: Decimal, consumed: Decimal) -> bool {
    original - consumed <= Decimal::ZERO
}

/// Sums exchange-guide line quantity drawn against one return line, honoring
/// the line's match scope. Lines on logically deleted guides never count.
pub async fn consumed_quantity(
    txn: &DatabaseTransaction,
    line: &return_guide_line::Model,
) -> Result<Decimal, ServiceError> {
    let mut query = ExchangeGuideLine::find()
        .filter(exchange_guide_line::Column::ProductCode.eq(line.product_code.as_str()))
        .filter(exchange_guide_line::Column::LotCode.eq(line.lot_code.as_str()));

    match line.match_scope {
        MatchScope::Exact => {
            query = query
                .filter(
                    exchange_guide_line::Column::ReturnGuideNumber
                        .eq(line.return_guide_number.as_str()),
                )
                .filter(exchange_guide_line::Column::Reference.eq(line.reference.as_str()))
                .filter(exchange_guide_line::Column::DocType.eq(line.doc_type));
        }
        MatchScope::ByDocument => {
            query = query.filter(
                exchange_guide_line::Column::ReturnGuideNumber
                    .eq(line.return_guide_number.as_str()),
            );
        }
        MatchScope::ByProductLot => {}
    }

    let exchange_lines = query.all(txn).await.map_err(ServiceError::db_error)?;
    if exchange_lines.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let guide_numbers: Vec<String> = exchange_lines
        .iter()
        .map(|l| l.guide_number.clone())
        .collect();
    let live_guides: HashSet<String> = ExchangeGuide::find()
        .filter(exchange_guide::Column::Number.is_in(guide_numbers))
        .filter(exchange_guide::Column::Deleted.eq(false))
        .all(txn)
        .await
        .map_err(ServiceError::db_error)?
        .into_iter()
        .map(|g| g.number)
        .collect();

    let consumed: Decimal = exchange_lines
        .iter()
        .filter(|l| live_guides.contains(&l.guide_number))
        .map(|l| l.quantity)
        .sum();

    Ok(consumed)
}

/// Recomputes one return line's processed flag from current exchange data.
/// Returns the resulting flag. The write is a plain recompute, so repeating
/// it with unchanged inputs changes nothing.
pub async fn refresh_processed(
    txn: &DatabaseTransaction,
    line: &return_guide_line::Model,
) -> Result<bool, ServiceError> {
    let consumed = consumed_quantity(txn, line).await?;
    let settled = is_settled(line.quantity, consumed);

    if settled != line.processed {
        debug!(
            return_guide = %line.return_guide_number,
            product_code = %line.product_code,
            lot_code = %line.lot_code,
            processed = settled,
            "Return line processed flag changed"
        );
        let mut active: return_guide_line::ActiveModel = line.clone().into();
        active.processed = Set(settled);
        active.update(txn).await.map_err(ServiceError::db_error)?;
    }

    Ok(settled)
}

/// Refreshes every return line touching a product lot. Registration and
/// reversal both funnel through here; the recompute moves flags in whichever
/// direction the data now supports.
pub async fn refresh_for_product_lot(
    txn: &DatabaseTransaction,
    product_code: &str,
    lot_code: &str,
) -> Result<usize, ServiceError> {
    let candidates = ReturnGuideLine::find()
        .filter(return_guide_line::Column::ProductCode.eq(product_code))
        .filter(return_guide_line::Column::LotCode.eq(lot_code))
        .all(txn)
        .await
        .map_err(ServiceError::db_error)?;

    let mut changed = 0;
    for line in &candidates {
        let before = line.processed;
        let after = refresh_processed(txn, line).await?;
        if before != after {
            changed += 1;
        }
    }

    Ok(changed)
}
