// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use chrono::Utc;
use pharmadist_api::{
    config::AppConfig,
    db::{self, DatabaseAccess},
    entities::{
        lot_balance, product,
        return_guide_line::{self, MatchScope},
    },
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Helper harness for spinning up application state backed by a file-based
/// SQLite database in a per-test temp directory.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _db_dir: TempDir,
    _event_task: tokio::task::JoinHandle<()>,
}

/// Seed data for one pending supplier-return line.
pub struct ReturnLineSeed<'a> {
    pub return_guide_number: &'a str,
    pub supplier_id: &'a str,
    pub product_code: &'a str,
    pub lot_code: &'a str,
    pub quantity: Decimal,
    pub reference: &'a str,
    pub doc_type: i32,
    pub match_scope: MatchScope,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = db_dir.path().join("pharmadist_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // One connection keeps SQLite writes strictly serialized.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_access = Arc::new(DatabaseAccess::new(Arc::new(pool)));

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = Arc::new(EventSender::new(event_tx));
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_access.clone(), event_sender.clone(), &cfg);

        let state = AppState {
            db: db_access,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", pharmadist_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _db_dir: db_dir,
            _event_task: event_task,
        }
    }

    /// Warehouse every exchange draws from, per the test configuration.
    pub fn exchange_warehouse_id(&self) -> i32 {
        self.state.config.exchange_warehouse_id
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn seed_product(&self, code: &str, name: &str, stock: Decimal) -> product::Model {
        product::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            stock: Set(stock),
            unit_cost: Set(dec!(7.50)),
            sale_price: Set(dec!(11.90)),
            updated_at: Set(Utc::now()),
        }
        .insert(self.state.db.get_pool())
        .await
        .expect("seed product for tests")
    }

    /// Seed a lot balance in the exchange warehouse.
    pub async fn seed_lot(
        &self,
        product_code: &str,
        lot_code: &str,
        balance: Decimal,
    ) -> lot_balance::Model {
        self.seed_lot_in(
            self.exchange_warehouse_id(),
            product_code,
            lot_code,
            balance,
        )
        .await
    }

    pub async fn seed_lot_in(
        &self,
        warehouse_id: i32,
        product_code: &str,
        lot_code: &str,
        balance: Decimal,
    ) -> lot_balance::Model {
        lot_balance::ActiveModel {
            product_code: Set(product_code.to_string()),
            warehouse_id: Set(warehouse_id),
            lot_code: Set(lot_code.to_string()),
            balance: Set(balance),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.state.db.get_pool())
        .await
        .expect("seed lot balance for tests")
    }

    pub async fn seed_return_line(&self, seed: ReturnLineSeed<'_>) -> return_guide_line::Model {
        return_guide_line::ActiveModel {
            return_guide_number: Set(seed.return_guide_number.to_string()),
            supplier_id: Set(seed.supplier_id.to_string()),
            product_code: Set(seed.product_code.to_string()),
            lot_code: Set(seed.lot_code.to_string()),
            quantity: Set(seed.quantity),
            reference: Set(seed.reference.to_string()),
            doc_type: Set(seed.doc_type),
            match_scope: Set(seed.match_scope),
            processed: Set(false),
            ..Default::default()
        }
        .insert(self.state.db.get_pool())
        .await
        .expect("seed return guide line for tests")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Decode a response body as JSON.
pub async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body should be valid json")
}
