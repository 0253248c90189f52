mod common;

use axum::http::{Method, StatusCode};
use common::{json_body, TestApp};
use pharmadist_api::entities::{
    audit_trail, ledger_entry,
    ledger_entry::{LedgerClass, MovementDirection},
    lot_balance, movement, movement_line, product, sequence_counter,
};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};

fn movement_body(direction: &str, spoilage: bool, lines: Vec<Value>) -> Value {
    json!({
        "movement_date": "2025-07-20",
        "warehouse_id": 1,
        "direction": direction,
        "concept": if direction == "inbound" { "Ingreso por compra" } else { "Salida por ajuste" },
        "reference": "OC-2025-118",
        "spoilage": spoilage,
        "lines": lines,
    })
}

#[tokio::test]
async fn inbound_receipt_creates_the_lot_and_restates_pricing() {
    let app = TestApp::new().await;
    let db = app.state.db.get_pool();

    // No lot row seeded: the receipt must create it.
    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(10))
        .await;

    let body = movement_body(
        "inbound",
        false,
        vec![json!({
            "product_code": "P00455",
            "lot_code": "L9001",
            "quantity": 40,
            "unit_cost": 8.10,
            "unit_price": 12.50,
        })],
    );
    let response = app.request(Method::POST, "/api/v1/movements", Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["data"]["document_number"], "MV01-000001");
    assert_eq!(payload["data"]["line_count"], 1);

    let product = product::Entity::find_by_id("P00455")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, dec!(50));
    assert_eq!(product.unit_cost, dec!(8.10));
    assert_eq!(product.sale_price, dec!(12.50));

    let lot = lot_balance::Entity::find()
        .filter(lot_balance::Column::LotCode.eq("L9001"))
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lot.warehouse_id, 1);
    assert_eq!(lot.balance, dec!(40));

    let entries = ledger_entry::Entity::find().all(db).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].class, LedgerClass::WarehouseMovement);
    assert_eq!(entries[0].direction, MovementDirection::Inbound);
    assert_eq!(entries[0].stock_after, dec!(50));
    // Ledger snapshots valuation after the restatement.
    assert_eq!(entries[0].unit_cost, dec!(8.10));

    let counter = sequence_counter::Entity::find_by_id("warehouse_movement")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(counter.value, "MV01-000001");

    let audits = audit_trail::Entity::find().all(db).await.unwrap();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].action, "register_movement");
    assert_eq!(audits[0].document_number, "MV01-000001");
}

#[tokio::test]
async fn outbound_spoilage_posts_under_the_spoilage_class() {
    let app = TestApp::new().await;
    let db = app.state.db.get_pool();

    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(50))
        .await;
    app.seed_lot_in(1, "P00455", "L2301", dec!(30)).await;

    let body = movement_body(
        "outbound",
        true,
        vec![json!({
            "product_code": "P00455",
            "lot_code": "L2301",
            "quantity": 12,
            "unit_cost": null,
            "unit_price": null,
        })],
    );
    let response = app.request(Method::POST, "/api/v1/movements", Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let product = product::Entity::find_by_id("P00455")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, dec!(38));
    // Movements without a restatement leave the valuation alone.
    assert_eq!(product.unit_cost, dec!(7.50));

    let lot = lot_balance::Entity::find().one(db).await.unwrap().unwrap();
    assert_eq!(lot.balance, dec!(18));

    let entry = ledger_entry::Entity::find().one(db).await.unwrap().unwrap();
    assert_eq!(entry.class, LedgerClass::Spoilage);
    assert_eq!(entry.direction, MovementDirection::Outbound);
    assert_eq!(entry.quantity, dec!(12));

    // A plain outbound adjustment stays in the ordinary movement class.
    let body = movement_body(
        "outbound",
        false,
        vec![json!({
            "product_code": "P00455",
            "lot_code": "L2301",
            "quantity": 5,
            "unit_cost": null,
            "unit_price": null,
        })],
    );
    let response = app.request(Method::POST, "/api/v1/movements", Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["data"]["document_number"], "MV01-000002");

    let plain = ledger_entry::Entity::find()
        .filter(ledger_entry::Column::DocumentNumber.eq("MV01-000002"))
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plain.class, LedgerClass::WarehouseMovement);
}

#[tokio::test]
async fn outbound_shortfall_fails_the_whole_movement() {
    let app = TestApp::new().await;
    let db = app.state.db.get_pool();

    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(50))
        .await;
    app.seed_lot_in(1, "P00455", "L2301", dec!(30)).await;
    app.seed_product("P00900", "Ibuprofeno 400mg x50", dec!(50))
        .await;
    app.seed_lot_in(1, "P00900", "L0007", dec!(2)).await;

    let body = movement_body(
        "outbound",
        false,
        vec![
            json!({
                "product_code": "P00455",
                "lot_code": "L2301",
                "quantity": 10,
                "unit_cost": null,
                "unit_price": null,
            }),
            json!({
                "product_code": "P00900",
                "lot_code": "L0007",
                "quantity": 8,
                "unit_cost": null,
                "unit_price": null,
            }),
        ],
    );
    let response = app.request(Method::POST, "/api/v1/movements", Some(body)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let first = product::Entity::find_by_id("P00455")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.stock, dec!(50));

    assert_eq!(movement::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(movement_line::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(ledger_entry::Entity::find().count(db).await.unwrap(), 0);

    let counter = sequence_counter::Entity::find_by_id("warehouse_movement")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(counter.value, "MV01-000000");
}

#[tokio::test]
async fn movement_detail_lists_header_and_lines() {
    let app = TestApp::new().await;

    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(10))
        .await;
    app.seed_product("P00900", "Ibuprofeno 400mg x50", dec!(10))
        .await;

    let body = movement_body(
        "inbound",
        false,
        vec![
            json!({
                "product_code": "P00455",
                "lot_code": "L9001",
                "quantity": 40,
                "unit_cost": 8.10,
                "unit_price": 12.50,
            }),
            json!({
                "product_code": "P00900",
                "lot_code": "L9002",
                "quantity": 15,
                "unit_cost": null,
                "unit_price": null,
            }),
        ],
    );
    let response = app.request(Method::POST, "/api/v1/movements", Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(Method::GET, "/api/v1/movements/MV01-000001", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["data"]["number"], "MV01-000001");
    assert_eq!(payload["data"]["movement_date"], "2025-07-20");
    assert_eq!(payload["data"]["direction"], "inbound");
    assert_eq!(payload["data"]["spoilage"], false);
    assert_eq!(payload["data"]["warehouse_id"], 1);
    let lines = payload["data"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["product_code"], "P00455");
    assert_eq!(lines[1]["product_code"], "P00900");

    let response = app
        .request(Method::GET, "/api/v1/movements/MV01-999999", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn movement_validation_rejects_bad_requests() {
    let app = TestApp::new().await;
    let db = app.state.db.get_pool();

    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(50))
        .await;
    app.seed_lot_in(1, "P00455", "L2301", dec!(30)).await;

    // Warehouse ids start at 1.
    let mut body = movement_body("outbound", false, vec![]);
    body["warehouse_id"] = json!(0);
    body["lines"] = json!([{
        "product_code": "P00455",
        "lot_code": "L2301",
        "quantity": 5,
        "unit_cost": null,
        "unit_price": null,
    }]);
    let response = app.request(Method::POST, "/api/v1/movements", Some(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = movement_body("outbound", false, vec![]);
    let response = app.request(Method::POST, "/api/v1/movements", Some(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = movement_body(
        "outbound",
        false,
        vec![json!({
            "product_code": "P00455",
            "lot_code": "L2301",
            "quantity": 0,
            "unit_cost": null,
            "unit_price": null,
        })],
    );
    let response = app.request(Method::POST, "/api/v1/movements", Some(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = movement_body(
        "outbound",
        false,
        vec![json!({
            "product_code": "NOPE",
            "lot_code": "L2301",
            "quantity": 5,
            "unit_cost": null,
            "unit_price": null,
        })],
    );
    let response = app.request(Method::POST, "/api/v1/movements", Some(body)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(movement::Entity::find().count(db).await.unwrap(), 0);
}
