use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Events emitted after a coordinator transaction commits. Consumers must
// treat them as notifications only; the ledger is the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ExchangeRegistered {
        guide_number: String,
        supplier_id: String,
        line_count: usize,
        dispatch_number: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    ExchangeReversed {
        guide_number: String,
        line_count: usize,
        occurred_at: DateTime<Utc>,
    },
    MovementRegistered {
        movement_number: String,
        warehouse_id: i32,
        line_count: usize,
        spoilage: bool,
        occurred_at: DateTime<Utc>,
    },
}

// Function to process incoming events. Today this only logs; downstream
// consumers (regulatory reporting, supplier notifications) hook in here.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::ExchangeRegistered {
                guide_number,
                supplier_id,
                line_count,
                dispatch_number,
                ..
            } => {
                info!(
                    guide_number = %guide_number,
                    supplier_id = %supplier_id,
                    line_count = line_count,
                    dispatch_number = ?dispatch_number,
                    "Exchange guide registered"
                );
            }
            Event::ExchangeReversed {
                guide_number,
                line_count,
                ..
            } => {
                info!(
                    guide_number = %guide_number,
                    line_count = line_count,
                    "Exchange guide reversed"
                );
            }
            Event::MovementRegistered {
                movement_number,
                warehouse_id,
                line_count,
                spoilage,
                ..
            } => {
                info!(
                    movement_number = %movement_number,
                    warehouse_id = warehouse_id,
                    line_count = line_count,
                    spoilage = spoilage,
                    "Warehouse movement registered"
                );
            }
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        sender
            .send(Event::ExchangeReversed {
                guide_number: "FF01-000007".into(),
                line_count: 2,
                occurred_at: Utc::now(),
            })
            .await
            .unwrap();

        match rx.recv().await {
            Some(Event::ExchangeReversed { guide_number, .. }) => {
                assert_eq!(guide_number, "FF01-000007");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let result = sender
            .send(Event::MovementRegistered {
                movement_number: "MV01-000001".into(),
                warehouse_id: 3,
                line_count: 1,
                spoilage: true,
                occurred_at: Utc::now(),
            })
            .await;
        assert!(result.is_err());
    }
}
