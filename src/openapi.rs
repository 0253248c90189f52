use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pharmadist API",
        version = "1.0.0",
        description = r#"
# Pharmadist Warehouse & Exchange-Guide API

Backend for the exchange and movement workflows of a pharmaceutical
distributor: supplier exchange guides, the dispatch guides issued with
them, warehouse movements, and the lot-level stock they all drive.

## Features

- **Exchange Guides**: Register exchanges of returned product with suppliers, reverse them when issued in error
- **Dispatch Guides**: Transport document issued automatically with every exchange
- **Returns Matching**: Pending supplier-return lines and their settlement against exchanged quantities
- **Warehouse Movements**: Manual inbound and outbound stock movements, including spoilage write-offs
- **Inventory**: Product stock and per-lot balances in the exchange warehouse
- **Counters**: Document numbering state, with an admin resync for the dispatch series
- **Audit**: Per-document record of registrations and reversals

## Error Handling

Failing endpoints return a consistent envelope with an appropriate HTTP status code:

```json
{
  "error": "Unprocessable Entity",
  "message": "Insufficient stock for product P00455: 4 on hand, 20 requested",
  "request_id": "req-abc123xyz",
  "timestamp": "2025-06-01T00:00:00Z"
}
```

## Pagination

List endpoints accept the following query parameters:
- `page`: Page number, 1-indexed (default: 1)
- `limit`: Items per page (default: 20, max: 100)
- `search`: Search term for filtering results
        "#,
        contact(
            name = "Pharmadist Systems",
            email = "sistemas@pharmadist.pe"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "https://erp.pharmadist.pe/api/v1", description = "Production server"),
        (url = "http://localhost:8080/api/v1", description = "Local development")
    ),
    tags(
        (name = "exchange-guides", description = "Exchange guide registration, reversal and lookup"),
        (name = "returns", description = "Pending supplier-return lines"),
        (name = "dispatch-guides", description = "Dispatch guide lookup"),
        (name = "movements", description = "Warehouse movement registration and lookup"),
        (name = "inventory", description = "Product and lot balance reads"),
        (name = "counters", description = "Document numbering state and repair"),
        (name = "audit", description = "Per-document audit trail")
    ),
    paths(
        // Exchange guides
        crate::handlers::exchange_guides::register_exchange,
        crate::handlers::exchange_guides::list_exchange_guides,
        crate::handlers::exchange_guides::next_numbers,
        crate::handlers::exchange_guides::get_exchange_guide,
        crate::handlers::exchange_guides::reverse_exchange,

        // Returns
        crate::handlers::returns::list_pending_returns,

        // Dispatch guides
        crate::handlers::dispatch_guides::get_dispatch_guide,

        // Movements
        crate::handlers::movements::register_movement,
        crate::handlers::movements::get_movement,

        // Inventory
        crate::handlers::inventory::list_products,
        crate::handlers::inventory::get_product,
        crate::handlers::inventory::list_lot_balances,

        // Counters
        crate::handlers::counters::get_counter,
        crate::handlers::counters::resync_dispatch_counter,

        // Audit
        crate::handlers::audit_trail::list_audit_entries,

        // Status & health intentionally omitted from OpenAPI paths for now
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::PaginatedResponse<serde_json::Value>,
            crate::ListQuery,

            // Exchange guide types
            crate::services::exchanges::NewExchangeGuide,
            crate::services::exchanges::NewExchangeLine,
            crate::services::exchanges::RegisteredExchange,
            crate::services::exchanges::ReversedExchange,
            crate::services::exchanges::NextNumbers,
            crate::handlers::exchange_guides::ExchangeGuideSummary,
            crate::handlers::exchange_guides::ExchangeLineView,
            crate::handlers::exchange_guides::ExchangeGuideResponse,

            // Return types
            crate::handlers::returns::PendingReturnLine,

            // Dispatch guide types
            crate::handlers::dispatch_guides::DispatchGuideView,

            // Movement types
            crate::services::movements::NewMovement,
            crate::services::movements::NewMovementLine,
            crate::services::movements::RegisteredMovement,
            crate::handlers::movements::MovementResponse,
            crate::handlers::movements::MovementLineView,

            // Inventory types
            crate::handlers::inventory::ProductSummary,
            crate::handlers::inventory::LotBalanceView,

            // Counter types
            crate::handlers::counters::CounterView,
            crate::handlers::counters::ResyncRequest,
            crate::services::counters::ResyncOutcome,

            // Audit types
            crate::handlers::audit_trail::AuditEntryView,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
