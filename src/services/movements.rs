use crate::{
    db::DatabaseAccess,
    entities::{
        ledger_entry::{LedgerClass, MovementDirection},
        movement::{self, Entity as Movement},
        movement_line::{self, Entity as MovementLine},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{audit, sequences, stock},
};
use chrono::{NaiveDate, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewMovementLine {
    pub product_code: String,
    pub lot_code: String,
    /// Quantity moved. Must be positive; `direction` carries the sign.
    pub quantity: Decimal,
    /// New valuation to stamp on the product master, when the movement
    /// carries one (typical for inbound receipts).
    pub unit_cost: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewMovement {
    pub movement_date: NaiveDate,
    #[validate(range(min = 1, message = "warehouse_id must be positive"))]
    pub warehouse_id: i32,
    #[schema(value_type = String, example = "outbound")]
    pub direction: MovementDirection,
    #[validate(length(min = 1, message = "concept is required"))]
    pub concept: String,
    pub reference: Option<String>,
    #[serde(default)]
    pub spoilage: bool,
    #[validate(length(min = 1, message = "at least one line is required"))]
    pub lines: Vec<NewMovementLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisteredMovement {
    pub document_number: String,
    pub line_count: usize,
}

/// Header plus lines, the consult shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementDetail {
    pub header: movement::Model,
    pub lines: Vec<movement_line::Model>,
}

pub struct MovementService {
    db: Arc<DatabaseAccess>,
    event_sender: Arc<EventSender>,
}

impl MovementService {
    pub fn new(db: Arc<DatabaseAccess>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Registers a warehouse movement: issues the document number, writes
    /// header and lines, moves stock per `direction`, stamps any new
    /// cost/price on the product and appends one ledger entry per line.
    /// Flagged outbound movements post under the spoilage ledger class.
    #[instrument(skip(self, request), fields(warehouse_id = request.warehouse_id, lines = request.lines.len()))]
    pub async fn register_movement(
        &self,
        request: NewMovement,
    ) -> Result<RegisteredMovement, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let warehouse_id = request.warehouse_id;
        let direction = request.direction;
        let spoilage = request.spoilage;

        let registered = self
            .db
            .transaction::<_, RegisteredMovement, ServiceError>(move |txn| {
                Box::pin(async move {
                    let number =
                        sequences::peek_next_number(txn, sequences::WAREHOUSE_MOVEMENT).await?;

                    movement::ActiveModel {
                        number: Set(number.clone()),
                        movement_date: Set(request.movement_date),
                        warehouse_id: Set(warehouse_id),
                        direction: Set(direction),
                        concept: Set(request.concept.clone()),
                        reference: Set(request.reference.clone()),
                        spoilage: Set(spoilage),
                        created_at: Set(Utc::now()),
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                    let class = match (direction, spoilage) {
                        (MovementDirection::Outbound, true) => LedgerClass::Spoilage,
                        _ => LedgerClass::WarehouseMovement,
                    };

                    for line in &request.lines {
                        let applied = match direction {
                            MovementDirection::Outbound => {
                                stock::apply_outbound(
                                    txn,
                                    &line.product_code,
                                    &line.lot_code,
                                    warehouse_id,
                                    line.quantity,
                                )
                                .await?
                            }
                            MovementDirection::Inbound => {
                                stock::apply_inbound(
                                    txn,
                                    &line.product_code,
                                    &line.lot_code,
                                    warehouse_id,
                                    line.quantity,
                                )
                                .await?
                            }
                        };

                        let product = stock::update_product_pricing(
                            txn,
                            applied.product,
                            line.unit_cost,
                            line.unit_price,
                        )
                        .await?;

                        movement_line::ActiveModel {
                            movement_number: Set(number.clone()),
                            product_code: Set(line.product_code.clone()),
                            lot_code: Set(line.lot_code.clone()),
                            quantity: Set(line.quantity),
                            unit_cost: Set(line.unit_cost),
                            unit_price: Set(line.unit_price),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                        stock::append_ledger_entry(
                            txn,
                            &product,
                            stock::LedgerLine {
                                document_number: &number,
                                class,
                                direction,
                                warehouse_id,
                                lot_code: &line.lot_code,
                                quantity: line.quantity,
                            },
                        )
                        .await?;
                    }

                    sequences::commit_advance(txn, sequences::WAREHOUSE_MOVEMENT, &number).await?;

                    audit::record(
                        txn,
                        "register_movement",
                        &number,
                        format!(
                            "{} {} lines in warehouse {} ({})",
                            request.lines.len(),
                            match direction {
                                MovementDirection::Inbound => "inbound",
                                MovementDirection::Outbound => "outbound",
                            },
                            warehouse_id,
                            request.concept
                        ),
                    )
                    .await?;

                    Ok(RegisteredMovement {
                        document_number: number,
                        line_count: request.lines.len(),
                    })
                })
            })
            .await?;

        counter!("pharmadist_movement.registered", 1);
        info!(
            document_number = %registered.document_number,
            lines = registered.line_count,
            "Warehouse movement registered"
        );

        self.event_sender
            .send(Event::MovementRegistered {
                movement_number: registered.document_number.clone(),
                warehouse_id,
                line_count: registered.line_count,
                spoilage,
                occurred_at: Utc::now(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(registered)
    }

    /// Header plus lines for one movement.
    pub async fn get_movement(&self, number: &str) -> Result<MovementDetail, ServiceError> {
        let db = self.db.get_pool();

        let header = Movement::find_by_id(number.trim())
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::DocumentNotFound(number.to_string()))?;

        let lines = header
            .find_related(MovementLine)
            .order_by_asc(movement_line::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(MovementDetail { header, lines })
    }
}
