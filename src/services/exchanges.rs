use crate::{
    config::AppConfig,
    db::DatabaseAccess,
    entities::{
        dispatch_guide::{self, Entity as DispatchGuide},
        exchange_guide::{self, Entity as ExchangeGuide},
        exchange_guide_line::{self, Entity as ExchangeGuideLine},
        ledger_entry::{LedgerClass, MovementDirection},
        return_guide_line::{self, Entity as ReturnGuideLine},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{audit, returns_matching, sequences, stock},
};
use chrono::{NaiveDate, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Knobs the exchange flow reads from configuration.
#[derive(Debug, Clone)]
pub struct ExchangeSettings {
    /// Warehouse all exchange stock moves against.
    pub warehouse_id: i32,
    pub dispatch_number_infix: String,
    pub dispatch_resync_min_date: NaiveDate,
}

impl From<&AppConfig> for ExchangeSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            warehouse_id: config.exchange_warehouse_id,
            dispatch_number_infix: config.dispatch_number_infix.clone(),
            dispatch_resync_min_date: config.dispatch_resync_min_date,
        }
    }
}

/// One product lot to exchange, pointing at the return-guide line it settles.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewExchangeLine {
    pub product_code: String,
    pub lot_code: String,
    pub expiry: Option<NaiveDate>,
    /// Quantity handed back to the supplier. Must be positive.
    pub quantity: Decimal,
    pub return_guide_number: String,
    pub reference: String,
    pub doc_type: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewExchangeGuide {
    pub guide_date: NaiveDate,
    #[validate(length(min = 1, message = "supplier_id is required"))]
    pub supplier_id: String,
    #[validate(length(min = 1, message = "transport_company is required"))]
    pub transport_company: String,
    pub transport_tax_id: String,
    pub vehicle_plate: String,
    pub arrival_point: String,
    pub addressee: String,
    /// Doc-type tag stamped on the accompanying dispatch guide.
    pub dispatch_doc_type: i32,
    pub gross_weight_kg: Option<Decimal>,
    #[validate(length(min = 1, message = "at least one line is required"))]
    pub lines: Vec<NewExchangeLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisteredExchange {
    pub document_number: String,
    pub dispatch_number: String,
    pub line_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReversedExchange {
    pub document_number: String,
    pub lines_reversed: usize,
}

/// Header plus lines, the consult/print shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeGuideDetail {
    pub header: exchange_guide::Model,
    pub lines: Vec<exchange_guide_line::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NextNumbers {
    pub exchange_guide: String,
    pub dispatch_guide: String,
}

/// Filters for the exchange-guide listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeGuideFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub supplier_id: Option<String>,
    pub number_prefix: Option<String>,
    pub include_deleted: bool,
}

pub(crate) fn validate_paging(page: u64, limit: u64) -> Result<(), ServiceError> {
    if page == 0 {
        return Err(ServiceError::ValidationError(
            "Page number must start at 1".to_string(),
        ));
    }
    if limit == 0 || limit > 1000 {
        return Err(ServiceError::ValidationError(
            "Limit must be between 1 and 1000".to_string(),
        ));
    }
    Ok(())
}

pub struct ExchangeService {
    db: Arc<DatabaseAccess>,
    event_sender: Arc<EventSender>,
    settings: ExchangeSettings,
}

impl ExchangeService {
    pub fn new(
        db: Arc<DatabaseAccess>,
        event_sender: Arc<EventSender>,
        settings: ExchangeSettings,
    ) -> Self {
        Self {
            db,
            event_sender,
            settings,
        }
    }

    /// Registers an exchange guide: issues both document numbers, writes the
    /// header and lines, draws down stock per line, appends ledger entries,
    /// refreshes return-line processed flags and creates the accompanying
    /// dispatch guide. All of it commits or none of it does.
    #[instrument(skip(self, request), fields(supplier_id = %request.supplier_id, lines = request.lines.len()))]
    pub async fn register_exchange(
        &self,
        request: NewExchangeGuide,
    ) -> Result<RegisteredExchange, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let warehouse_id = self.settings.warehouse_id;
        let supplier_id = request.supplier_id.clone();

        let registered = self
            .db
            .transaction::<_, RegisteredExchange, ServiceError>(move |txn| {
                Box::pin(async move {
                    // Both counters are locked for the whole unit of work so
                    // concurrent registrations cannot issue the same number.
                    let guide_number =
                        sequences::peek_next_number(txn, sequences::EXCHANGE_GUIDE).await?;
                    let dispatch_number =
                        sequences::peek_next_number(txn, sequences::DISPATCH_GUIDE).await?;

                    exchange_guide::ActiveModel {
                        number: Set(guide_number.clone()),
                        guide_date: Set(request.guide_date),
                        supplier_id: Set(request.supplier_id.clone()),
                        transport_company: Set(request.transport_company.clone()),
                        transport_tax_id: Set(request.transport_tax_id.clone()),
                        vehicle_plate: Set(request.vehicle_plate.clone()),
                        arrival_point: Set(request.arrival_point.clone()),
                        addressee: Set(request.addressee.clone()),
                        deleted: Set(false),
                        created_at: Set(Utc::now()),
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                    for line in &request.lines {
                        let applied = stock::apply_outbound(
                            txn,
                            &line.product_code,
                            &line.lot_code,
                            warehouse_id,
                            line.quantity,
                        )
                        .await?;

                        exchange_guide_line::ActiveModel {
                            guide_number: Set(guide_number.clone()),
                            product_code: Set(line.product_code.clone()),
                            lot_code: Set(line.lot_code.clone()),
                            expiry: Set(line.expiry),
                            quantity: Set(line.quantity),
                            return_guide_number: Set(line.return_guide_number.clone()),
                            reference: Set(line.reference.clone()),
                            doc_type: Set(line.doc_type),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                        stock::append_ledger_entry(
                            txn,
                            &applied.product,
                            stock::LedgerLine {
                                document_number: &guide_number,
                                class: LedgerClass::Exchange,
                                direction: MovementDirection::Outbound,
                                warehouse_id,
                                lot_code: &line.lot_code,
                                quantity: line.quantity,
                            },
                        )
                        .await?;

                        returns_matching::refresh_for_product_lot(
                            txn,
                            &line.product_code,
                            &line.lot_code,
                        )
                        .await?;
                    }

                    dispatch_guide::ActiveModel {
                        number: Set(dispatch_number.clone()),
                        sale_document: Set(guide_number.clone()),
                        doc_type: Set(request.dispatch_doc_type),
                        guide_date: Set(request.guide_date),
                        transport_company: Set(request.transport_company.clone()),
                        transport_tax_id: Set(request.transport_tax_id.clone()),
                        vehicle_plate: Set(request.vehicle_plate.clone()),
                        destination: Set(request.addressee.clone()),
                        gross_weight_kg: Set(request.gross_weight_kg),
                        created_at: Set(Utc::now()),
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                    sequences::commit_advance(txn, sequences::EXCHANGE_GUIDE, &guide_number)
                        .await?;
                    sequences::commit_advance(txn, sequences::DISPATCH_GUIDE, &dispatch_number)
                        .await?;

                    audit::record(
                        txn,
                        "register_exchange",
                        &guide_number,
                        format!(
                            "{} lines for supplier {}, dispatch {}",
                            request.lines.len(),
                            request.supplier_id,
                            dispatch_number
                        ),
                    )
                    .await?;

                    Ok(RegisteredExchange {
                        document_number: guide_number,
                        dispatch_number,
                        line_count: request.lines.len(),
                    })
                })
            })
            .await?;

        counter!("pharmadist_exchange.registered", 1);
        info!(
            document_number = %registered.document_number,
            dispatch_number = %registered.dispatch_number,
            "Exchange guide registered"
        );

        self.event_sender
            .send(Event::ExchangeRegistered {
                guide_number: registered.document_number.clone(),
                supplier_id,
                line_count: registered.line_count,
                dispatch_number: Some(registered.dispatch_number.clone()),
                occurred_at: Utc::now(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(registered)
    }

    /// Reverses a registered exchange guide: restores stock and lot balances
    /// line by line, appends compensating ledger entries, marks the header
    /// logically deleted, re-runs processed-flag propagation and resyncs the
    /// dispatch counter against the surviving dispatch guides.
    #[instrument(skip(self))]
    pub async fn reverse_exchange(
        &self,
        document_number: &str,
    ) -> Result<ReversedExchange, ServiceError> {
        let warehouse_id = self.settings.warehouse_id;
        let infix = self.settings.dispatch_number_infix.clone();
        let min_date = self.settings.dispatch_resync_min_date;
        let number = document_number.trim().to_string();

        let reversed = self
            .db
            .transaction::<_, ReversedExchange, ServiceError>(move |txn| {
                Box::pin(async move {
                    let guide = ExchangeGuide::find_by_id(number.as_str())
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| ServiceError::DocumentNotFound(number.clone()))?;

                    if guide.deleted {
                        return Err(ServiceError::AlreadyDeleted(number.clone()));
                    }

                    let lines = guide
                        .find_related(ExchangeGuideLine)
                        .all(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    for line in &lines {
                        let applied = stock::apply_inbound(
                            txn,
                            &line.product_code,
                            &line.lot_code,
                            warehouse_id,
                            line.quantity,
                        )
                        .await?;

                        stock::append_ledger_entry(
                            txn,
                            &applied.product,
                            stock::LedgerLine {
                                document_number: &number,
                                class: LedgerClass::ExchangeReversal,
                                direction: MovementDirection::Inbound,
                                warehouse_id,
                                lot_code: &line.lot_code,
                                quantity: line.quantity,
                            },
                        )
                        .await?;
                    }

                    // The deletion flag must land before the recompute so the
                    // reversed lines stop counting toward consumption.
                    let mut active: exchange_guide::ActiveModel = guide.into();
                    active.deleted = Set(true);
                    active.update(txn).await.map_err(ServiceError::db_error)?;

                    for line in &lines {
                        returns_matching::refresh_for_product_lot(
                            txn,
                            &line.product_code,
                            &line.lot_code,
                        )
                        .await?;
                    }

                    sequences::resync_dispatch_counter(txn, &infix, min_date).await?;

                    audit::record(
                        txn,
                        "reverse_exchange",
                        &number,
                        format!("{} lines restored", lines.len()),
                    )
                    .await?;

                    Ok(ReversedExchange {
                        document_number: number,
                        lines_reversed: lines.len(),
                    })
                })
            })
            .await?;

        counter!("pharmadist_exchange.reversed", 1);
        info!(
            document_number = %reversed.document_number,
            lines = reversed.lines_reversed,
            "Exchange guide reversed"
        );

        self.event_sender
            .send(Event::ExchangeReversed {
                guide_number: reversed.document_number.clone(),
                line_count: reversed.lines_reversed,
                occurred_at: Utc::now(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(reversed)
    }

    /// Header plus lines for one guide, deleted or not.
    pub async fn get_guide(&self, number: &str) -> Result<ExchangeGuideDetail, ServiceError> {
        let db = self.db.get_pool();

        let header = ExchangeGuide::find_by_id(number.trim())
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::DocumentNotFound(number.to_string()))?;

        let lines = header
            .find_related(ExchangeGuideLine)
            .order_by_asc(exchange_guide_line::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(ExchangeGuideDetail { header, lines })
    }

    /// Dispatch header issued alongside an exchange guide.
    pub async fn get_dispatch_guide(
        &self,
        number: &str,
    ) -> Result<dispatch_guide::Model, ServiceError> {
        DispatchGuide::find_by_id(number.trim())
            .one(self.db.get_pool())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::DocumentNotFound(number.to_string()))
    }

    pub async fn list_guides(
        &self,
        filter: ExchangeGuideFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<exchange_guide::Model>, u64), ServiceError> {
        validate_paging(page, limit)?;

        let db = self.db.get_pool();
        let mut query = ExchangeGuide::find();

        if !filter.include_deleted {
            query = query.filter(exchange_guide::Column::Deleted.eq(false));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(exchange_guide::Column::GuideDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(exchange_guide::Column::GuideDate.lte(to));
        }
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(exchange_guide::Column::SupplierId.eq(supplier_id));
        }
        if let Some(prefix) = filter.number_prefix {
            query = query.filter(exchange_guide::Column::Number.starts_with(prefix));
        }

        let paginator = query
            .order_by_desc(exchange_guide::Column::Number)
            .paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let guides = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((guides, total))
    }

    /// Return-guide lines still awaiting exchange, the picker for a new guide.
    pub async fn pending_returns(
        &self,
        supplier_id: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<return_guide_line::Model>, u64), ServiceError> {
        validate_paging(page, limit)?;

        let db = self.db.get_pool();
        let mut query =
            ReturnGuideLine::find().filter(return_guide_line::Column::Processed.eq(false));

        if let Some(supplier_id) = supplier_id {
            query = query.filter(return_guide_line::Column::SupplierId.eq(supplier_id));
        }

        let paginator = query
            .order_by_asc(return_guide_line::Column::ReturnGuideNumber)
            .order_by_asc(return_guide_line::Column::Id)
            .paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let lines = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((lines, total))
    }

    /// Peeks both counters without advancing them, for form prefill.
    pub async fn next_numbers(&self) -> Result<NextNumbers, ServiceError> {
        let db = self.db.get_pool();

        let exchange = sequences::read_counter(db, sequences::EXCHANGE_GUIDE).await?;
        let dispatch = sequences::read_counter(db, sequences::DISPATCH_GUIDE).await?;

        Ok(NextNumbers {
            exchange_guide: sequences::peek_next(&exchange.value),
            dispatch_guide: sequences::peek_next(&dispatch.value),
        })
    }
}
