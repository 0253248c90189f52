mod common;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use common::{json_body, ReturnLineSeed, TestApp};
use pharmadist_api::{
    entities::{
        audit_trail, exchange_guide, ledger_entry, lot_balance, product,
        return_guide_line::{self, MatchScope},
        sequence_counter,
    },
    errors::ServiceError,
    services::exchanges::{ExchangeGuideFilter, NewExchangeGuide, NewExchangeLine},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

fn service_request(lines: Vec<NewExchangeLine>) -> NewExchangeGuide {
    NewExchangeGuide {
        guide_date: chrono::NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
        supplier_id: "SUP-00123".to_string(),
        transport_company: "Transportes Andinos SAC".to_string(),
        transport_tax_id: "20504321789".to_string(),
        vehicle_plate: "ABC-123".to_string(),
        arrival_point: "Av. Argentina 2345, Callao".to_string(),
        addressee: "Laboratorios Delta SA".to_string(),
        dispatch_doc_type: 9,
        gross_weight_kg: None,
        lines,
    }
}

fn line(product_code: &str, lot_code: &str, quantity: Decimal) -> NewExchangeLine {
    NewExchangeLine {
        product_code: product_code.to_string(),
        lot_code: lot_code.to_string(),
        expiry: None,
        quantity,
        return_guide_number: "RG-0101".to_string(),
        reference: "FT-7788".to_string(),
        doc_type: 2,
    }
}

/// Everything the registration path writes, for before/after comparison.
async fn write_counts(app: &TestApp) -> (u64, u64, u64) {
    let db = app.state.db.get_pool();
    let guides = exchange_guide::Entity::find().count(db).await.unwrap();
    let entries = ledger_entry::Entity::find().count(db).await.unwrap();
    let audits = audit_trail::Entity::find().count(db).await.unwrap();
    (guides, entries, audits)
}

#[tokio::test]
async fn insufficient_stock_fails_without_partial_writes() {
    let app = TestApp::new().await;
    let db = app.state.db.get_pool();

    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(10))
        .await;
    app.seed_lot("P00455", "L2301", dec!(10)).await;
    app.seed_return_line(ReturnLineSeed {
        return_guide_number: "RG-0101",
        supplier_id: "SUP-00123",
        product_code: "P00455",
        lot_code: "L2301",
        quantity: dec!(25),
        reference: "FT-7788",
        doc_type: 2,
        match_scope: MatchScope::Exact,
    })
    .await;

    let service = app.state.exchange_service();
    let err = service
        .register_exchange(service_request(vec![line("P00455", "L2301", dec!(25))]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock { requested, .. } if requested == dec!(25));

    let product = product::Entity::find_by_id("P00455")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, dec!(10));

    let return_line = return_guide_line::Entity::find()
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert!(!return_line.processed);

    assert_eq!(write_counts(&app).await, (0, 0, 0));
}

#[tokio::test]
async fn insufficient_lot_balance_fails_without_partial_writes() {
    let app = TestApp::new().await;
    let db = app.state.db.get_pool();

    // Plenty of global stock, but the lot itself is short.
    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(100))
        .await;
    app.seed_lot("P00455", "L2301", dec!(5)).await;

    let service = app.state.exchange_service();
    let err = service
        .register_exchange(service_request(vec![line("P00455", "L2301", dec!(20))]))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::InsufficientLotBalance { available, .. } if available == dec!(5)
    );

    let product = product::Entity::find_by_id("P00455")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock, dec!(100));
    let lot = lot_balance::Entity::find().one(db).await.unwrap().unwrap();
    assert_eq!(lot.balance, dec!(5));

    assert_eq!(write_counts(&app).await, (0, 0, 0));

    // Counters were peeked but never committed.
    let counter = sequence_counter::Entity::find_by_id("exchange_guide")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(counter.value, "FF01-000000");
}

#[tokio::test]
async fn failure_on_a_later_line_rolls_back_earlier_lines() {
    let app = TestApp::new().await;
    let db = app.state.db.get_pool();

    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(50))
        .await;
    app.seed_lot("P00455", "L2301", dec!(20)).await;
    app.seed_product("P00900", "Ibuprofeno 400mg x50", dec!(50))
        .await;
    app.seed_lot("P00900", "L0007", dec!(1)).await;

    let service = app.state.exchange_service();
    let err = service
        .register_exchange(service_request(vec![
            line("P00455", "L2301", dec!(20)),
            line("P00900", "L0007", dec!(10)),
        ]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientLotBalance { .. });

    // The first line's draw-down did not survive the rollback.
    let first = product::Entity::find_by_id("P00455")
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.stock, dec!(50));
    let first_lot = lot_balance::Entity::find()
        .filter(lot_balance::Column::ProductCode.eq("P00455"))
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first_lot.balance, dec!(20));

    assert_eq!(write_counts(&app).await, (0, 0, 0));
}

#[tokio::test]
async fn unknown_product_and_unknown_lot_map_to_not_found() {
    let app = TestApp::new().await;

    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(50))
        .await;

    let body = json!({
        "guide_date": "2025-07-15",
        "supplier_id": "SUP-00123",
        "transport_company": "Transportes Andinos SAC",
        "transport_tax_id": "20504321789",
        "vehicle_plate": "ABC-123",
        "arrival_point": "Av. Argentina 2345, Callao",
        "addressee": "Laboratorios Delta SA",
        "dispatch_doc_type": 9,
        "gross_weight_kg": null,
        "lines": [{
            "product_code": "NOPE",
            "lot_code": "L2301",
            "expiry": null,
            "quantity": 1,
            "return_guide_number": "RG-0101",
            "reference": "FT-7788",
            "doc_type": 2,
        }],
    });
    let response = app
        .request(Method::POST, "/api/v1/exchange-guides", Some(body))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Known product, but no balance row for that lot in the warehouse.
    let body = json!({
        "guide_date": "2025-07-15",
        "supplier_id": "SUP-00123",
        "transport_company": "Transportes Andinos SAC",
        "transport_tax_id": "20504321789",
        "vehicle_plate": "ABC-123",
        "arrival_point": "Av. Argentina 2345, Callao",
        "addressee": "Laboratorios Delta SA",
        "dispatch_doc_type": 9,
        "gross_weight_kg": null,
        "lines": [{
            "product_code": "P00455",
            "lot_code": "L9999",
            "expiry": null,
            "quantity": 1,
            "return_guide_number": "RG-0101",
            "reference": "FT-7788",
            "doc_type": 2,
        }],
    });
    let response = app
        .request(Method::POST, "/api/v1/exchange-guides", Some(body))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = json_body(response).await;
    assert!(payload["message"].as_str().unwrap().contains("L9999"));
}

#[tokio::test]
async fn validation_rejects_empty_lines_and_nonpositive_quantities() {
    let app = TestApp::new().await;

    app.seed_product("P00455", "Amoxicilina 500mg x100", dec!(50))
        .await;
    app.seed_lot("P00455", "L2301", dec!(20)).await;

    let empty = json!({
        "guide_date": "2025-07-15",
        "supplier_id": "SUP-00123",
        "transport_company": "Transportes Andinos SAC",
        "transport_tax_id": "20504321789",
        "vehicle_plate": "ABC-123",
        "arrival_point": "Av. Argentina 2345, Callao",
        "addressee": "Laboratorios Delta SA",
        "dispatch_doc_type": 9,
        "gross_weight_kg": null,
        "lines": [],
    });
    let response = app
        .request(Method::POST, "/api/v1/exchange-guides", Some(empty))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let service = app.state.exchange_service();
    let err = service
        .register_exchange(service_request(vec![line("P00455", "L2301", dec!(0))]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidQuantity(_));

    let err = service
        .register_exchange(service_request(vec![line("P00455", "L2301", dec!(-3))]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidQuantity(_));

    assert_eq!(write_counts(&app).await, (0, 0, 0));
}

#[tokio::test]
async fn listing_rejects_out_of_range_paging() {
    let app = TestApp::new().await;
    let service = app.state.exchange_service();

    let err = service
        .list_guides(ExchangeGuideFilter::default(), 0, 20)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let err = service
        .list_guides(ExchangeGuideFilter::default(), 1, 5000)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}
