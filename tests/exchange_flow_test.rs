mod common;

use axum::http::{Method, StatusCode};
use common::{json_body, ReturnLineSeed, TestApp};
use pharmadist_api::entities::{
    audit_trail, dispatch_guide, exchange_guide,
    ledger_entry::{self, LedgerClass, MovementDirection},
    lot_balance, product,
    return_guide_line::{self, MatchScope},
    sequence_counter,
};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

fn exchange_request(lines: serde_json::Value) -> serde_json::Value {
    json!({
        "guide_date": "2025-07-15",
        "supplier_id": "SUP-00123",
        "transport_company": "Transportes Andinos SAC",
        "transport_tax_id": "20504321789",
        "vehicle_plate": "ABC-123",
        "arrival_point": "Av. Argentina 2345, Callao",
        "addressee": "Laboratorios Delta SA",
        "dispatch_doc_type": 9,
        "gross_weight_kg": 12.5,
        "lines": lines,
    })
}

#[tokio::test]
async fn register_exchange_moves_stock_and_issues_both_documents() {
    let app = TestApp::new().await;
    let db = app.state.db.get_pool();

    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(50))
        .await;
    app.seed_lot("P00455", "L2301", dec!(20)).await;
    app.seed_return_line(ReturnLineSeed {
        return_guide_number: "RG-0101",
        supplier_id: "SUP-00123",
        product_code: "P00455",
        lot_code: "L2301",
        quantity: dec!(20),
        reference: "FT-7788",
        doc_type: 2,
        match_scope: MatchScope::Exact,
    })
    .await;

    let body = exchange_request(json!([{
        "product_code": "P00455",
        "lot_code": "L2301",
        "expiry": "2026-03-31",
        "quantity": 20,
        "return_guide_number": "RG-0101",
        "reference": "FT-7788",
        "doc_type": 2,
    }]));

    let response = app
        .request(Method::POST, "/api/v1/exchange-guides", Some(body))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["data"]["document_number"], json!("FF01-000001"));
    assert_eq!(payload["data"]["dispatch_number"], json!("T002-000001"));
    assert_eq!(payload["data"]["line_count"], json!(1));

    // Stock and lot balance both drained by the exchanged quantity.
    let product = product::Entity::find_by_id("P00455")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, dec!(30));

    let lot = lot_balance::Entity::find()
        .filter(lot_balance::Column::ProductCode.eq("P00455"))
        .filter(lot_balance::Column::LotCode.eq("L2301"))
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lot.balance, dec!(0));

    // Exactly one ledger entry, outbound, snapshotting the resulting stock.
    let entries = ledger_entry::Entity::find()
        .filter(ledger_entry::Column::DocumentNumber.eq("FF01-000001"))
        .all(db)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].class, LedgerClass::Exchange);
    assert_eq!(entries[0].direction, MovementDirection::Outbound);
    assert_eq!(entries[0].quantity, dec!(20));
    assert_eq!(entries[0].stock_after, dec!(30));
    assert_eq!(entries[0].warehouse_id, app.exchange_warehouse_id());

    // The matched return line is settled.
    let return_line = return_guide_line::Entity::find()
        .filter(return_guide_line::Column::ReturnGuideNumber.eq("RG-0101"))
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert!(return_line.processed);

    // The accompanying dispatch guide cites the exchange document.
    let dispatch = dispatch_guide::Entity::find_by_id("T002-000001")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dispatch.sale_document, "FF01-000001");
    assert_eq!(dispatch.doc_type, 9);
    assert_eq!(dispatch.destination, "Laboratorios Delta SA");

    // Both counters advanced once.
    let exchange_counter = sequence_counter::Entity::find_by_id("exchange_guide")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(exchange_counter.value, "FF01-000001");
    let dispatch_counter = sequence_counter::Entity::find_by_id("dispatch_guide")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dispatch_counter.value, "T002-000001");

    // One audit row for the registration.
    let audit_rows = audit_trail::Entity::find()
        .filter(audit_trail::Column::DocumentNumber.eq("FF01-000001"))
        .all(db)
        .await
        .unwrap();
    assert_eq!(audit_rows.len(), 1);
    assert_eq!(audit_rows[0].action, "register_exchange");
}

#[tokio::test]
async fn registered_guide_is_readable_with_lines_and_clears_pending_returns() {
    let app = TestApp::new().await;

    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(50))
        .await;
    app.seed_lot("P00455", "L2301", dec!(20)).await;
    app.seed_return_line(ReturnLineSeed {
        return_guide_number: "RG-0101",
        supplier_id: "SUP-00123",
        product_code: "P00455",
        lot_code: "L2301",
        quantity: dec!(20),
        reference: "FT-7788",
        doc_type: 2,
        match_scope: MatchScope::Exact,
    })
    .await;

    let pending = app
        .request(Method::GET, "/api/v1/returns/pending", None)
        .await;
    assert_eq!(pending.status(), StatusCode::OK);
    let pending = json_body(pending).await;
    assert_eq!(pending["data"]["total"], json!(1));
    assert_eq!(
        pending["data"]["items"][0]["return_guide_number"],
        json!("RG-0101")
    );
    assert_eq!(pending["data"]["items"][0]["match_scope"], json!("exact"));

    let body = exchange_request(json!([{
        "product_code": "P00455",
        "lot_code": "L2301",
        "expiry": null,
        "quantity": 20,
        "return_guide_number": "RG-0101",
        "reference": "FT-7788",
        "doc_type": 2,
    }]));
    let response = app
        .request(Method::POST, "/api/v1/exchange-guides", Some(body))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Detail view returns the header with its lines.
    let detail = app
        .request(Method::GET, "/api/v1/exchange-guides/FF01-000001", None)
        .await;
    assert_eq!(detail.status(), StatusCode::OK);
    let detail = json_body(detail).await;
    assert_eq!(detail["data"]["number"], json!("FF01-000001"));
    assert_eq!(detail["data"]["deleted"], json!(false));
    assert_eq!(detail["data"]["supplier_id"], json!("SUP-00123"));
    assert_eq!(detail["data"]["lines"].as_array().unwrap().len(), 1);
    assert_eq!(
        detail["data"]["lines"][0]["return_guide_number"],
        json!("RG-0101")
    );

    // The settled line no longer shows up as pending.
    let pending = app
        .request(Method::GET, "/api/v1/returns/pending", None)
        .await;
    let pending = json_body(pending).await;
    assert_eq!(pending["data"]["total"], json!(0));
    assert!(pending["data"]["items"].as_array().unwrap().is_empty());

    // Listing shows the registered guide.
    let list = app
        .request(Method::GET, "/api/v1/exchange-guides?supplier_id=SUP-00123", None)
        .await;
    let list = json_body(list).await;
    assert_eq!(list["data"]["total"], json!(1));
    assert_eq!(list["data"]["items"][0]["number"], json!("FF01-000001"));

    // The dispatch guide is readable through its own endpoint.
    let dispatch = app
        .request(Method::GET, "/api/v1/dispatch-guides/T002-000001", None)
        .await;
    assert_eq!(dispatch.status(), StatusCode::OK);
    let dispatch = json_body(dispatch).await;
    assert_eq!(dispatch["data"]["sale_document"], json!("FF01-000001"));
}

#[tokio::test]
async fn next_numbers_previews_without_advancing() {
    let app = TestApp::new().await;
    let db = app.state.db.get_pool();

    let preview = app
        .request(Method::GET, "/api/v1/exchange-guides/next-numbers", None)
        .await;
    assert_eq!(preview.status(), StatusCode::OK);
    let preview = json_body(preview).await;
    assert_eq!(preview["data"]["exchange_guide"], json!("FF01-000001"));
    assert_eq!(preview["data"]["dispatch_guide"], json!("T002-000001"));

    // Peeking twice returns the same numbers; the counters did not move.
    let again = app
        .request(Method::GET, "/api/v1/exchange-guides/next-numbers", None)
        .await;
    let again = json_body(again).await;
    assert_eq!(again["data"]["exchange_guide"], json!("FF01-000001"));

    let counter = sequence_counter::Entity::find_by_id("exchange_guide")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(counter.value, "FF01-000000");
}

#[tokio::test]
async fn consecutive_registrations_take_consecutive_numbers() {
    let app = TestApp::new().await;

    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(50))
        .await;
    app.seed_lot("P00455", "L2301", dec!(20)).await;

    for expected in ["FF01-000001", "FF01-000002"] {
        let body = exchange_request(json!([{
            "product_code": "P00455",
            "lot_code": "L2301",
            "expiry": null,
            "quantity": 5,
            "return_guide_number": "RG-0101",
            "reference": "FT-7788",
            "doc_type": 2,
        }]));
        let response = app
            .request(Method::POST, "/api/v1/exchange-guides", Some(body))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["data"]["document_number"], json!(expected));
    }

    let exchange_guides = exchange_guide::Entity::find()
        .all(app.state.db.get_pool())
        .await
        .unwrap();
    assert_eq!(exchange_guides.len(), 2);
}

#[tokio::test]
async fn status_and_health_report_ok() {
    let app = TestApp::new().await;

    let status = app.request(Method::GET, "/api/v1/status", None).await;
    assert_eq!(status.status(), StatusCode::OK);
    let status = json_body(status).await;
    assert_eq!(status["data"]["service"], json!("pharmadist-api"));

    let health = app.request(Method::GET, "/api/v1/health", None).await;
    assert_eq!(health.status(), StatusCode::OK);
    let health = json_body(health).await;
    assert_eq!(health["data"]["database"], json!("healthy"));
}
