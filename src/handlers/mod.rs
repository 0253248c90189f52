pub mod audit_trail;
pub mod counters;
pub mod dispatch_guides;
pub mod exchange_guides;
pub mod inventory;
pub mod movements;
pub mod returns;

use crate::{config::AppConfig, db::DatabaseAccess, events::EventSender, services};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub exchanges: Arc<services::exchanges::ExchangeService>,
    pub movements: Arc<services::movements::MovementService>,
    pub inventory: Arc<services::inventory::InventoryService>,
    pub counters: Arc<services::counters::CounterService>,
}

impl AppServices {
    pub fn new(
        db: Arc<DatabaseAccess>,
        event_sender: Arc<EventSender>,
        config: &AppConfig,
    ) -> Self {
        let exchanges = Arc::new(services::exchanges::ExchangeService::new(
            db.clone(),
            event_sender.clone(),
            services::exchanges::ExchangeSettings::from(config),
        ));
        let movements = Arc::new(services::movements::MovementService::new(
            db.clone(),
            event_sender,
        ));
        let inventory = Arc::new(services::inventory::InventoryService::new(
            db.clone(),
            config.exchange_warehouse_id,
        ));
        let counters = Arc::new(services::counters::CounterService::new(
            db,
            config.dispatch_number_infix.clone(),
            config.dispatch_resync_min_date,
        ));

        Self {
            exchanges,
            movements,
            inventory,
            counters,
        }
    }
}
