use anyhow::Result;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::prelude::*;
use std::time::Duration;
use tracing::{error, info};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_products_table::Migration),
            Box::new(m20240101_000002_create_lot_balances_table::Migration),
            Box::new(m20240101_000003_create_ledger_entries_table::Migration),
            Box::new(m20240101_000004_create_exchange_guide_tables::Migration),
            Box::new(m20240101_000005_create_return_guide_lines_table::Migration),
            Box::new(m20240101_000006_create_dispatch_guides_table::Migration),
            Box::new(m20240101_000007_create_movement_tables::Migration),
            Box::new(m20240101_000008_create_sequence_counters_table::Migration),
            Box::new(m20240101_000009_create_audit_trail_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_products_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Code)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(
                            ColumnDef::new(Products::Stock)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::UnitCost)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::SalePrice)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Code,
        Name,
        Stock,
        UnitCost,
        SalePrice,
        UpdatedAt,
    }
}

mod m20240101_000002_create_lot_balances_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_lot_balances_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(LotBalances::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LotBalances::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LotBalances::ProductCode).string().not_null())
                        .col(
                            ColumnDef::new(LotBalances::WarehouseId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LotBalances::LotCode).string().not_null())
                        .col(
                            ColumnDef::new(LotBalances::Balance)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(LotBalances::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // One balance row per product/warehouse/lot triple
            manager
                .create_index(
                    Index::create()
                        .name("idx_lot_balances_product_warehouse_lot")
                        .table(LotBalances::Table)
                        .col(LotBalances::ProductCode)
                        .col(LotBalances::WarehouseId)
                        .col(LotBalances::LotCode)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_lot_balances_product_code")
                        .table(LotBalances::Table)
                        .col(LotBalances::ProductCode)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LotBalances::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum LotBalances {
        Table,
        Id,
        ProductCode,
        WarehouseId,
        LotCode,
        Balance,
        UpdatedAt,
    }
}

mod m20240101_000003_create_ledger_entries_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_ledger_entries_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(LedgerEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LedgerEntries::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LedgerEntries::DocumentNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LedgerEntries::Class).string().not_null())
                        .col(ColumnDef::new(LedgerEntries::Direction).string().not_null())
                        .col(
                            ColumnDef::new(LedgerEntries::ProductCode)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LedgerEntries::LotCode).string().not_null())
                        .col(
                            ColumnDef::new(LedgerEntries::WarehouseId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LedgerEntries::Quantity)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LedgerEntries::UnitCost)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(LedgerEntries::UnitPrice)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(LedgerEntries::StockAfter)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LedgerEntries::OccurredAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_ledger_entries_document_number")
                        .table(LedgerEntries::Table)
                        .col(LedgerEntries::DocumentNumber)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_ledger_entries_product_lot")
                        .table(LedgerEntries::Table)
                        .col(LedgerEntries::ProductCode)
                        .col(LedgerEntries::LotCode)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_ledger_entries_occurred_at")
                        .table(LedgerEntries::Table)
                        .col(LedgerEntries::OccurredAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum LedgerEntries {
        Table,
        Id,
        DocumentNumber,
        Class,
        Direction,
        ProductCode,
        LotCode,
        WarehouseId,
        Quantity,
        UnitCost,
        UnitPrice,
        StockAfter,
        OccurredAt,
    }
}

mod m20240101_000004_create_exchange_guide_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_exchange_guide_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ExchangeGuides::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ExchangeGuides::Number)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ExchangeGuides::GuideDate).date().not_null())
                        .col(
                            ColumnDef::new(ExchangeGuides::SupplierId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ExchangeGuides::TransportCompany)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ExchangeGuides::TransportTaxId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ExchangeGuides::VehiclePlate)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ExchangeGuides::ArrivalPoint)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ExchangeGuides::Addressee).string().not_null())
                        .col(
                            ColumnDef::new(ExchangeGuides::Deleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ExchangeGuides::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_exchange_guides_supplier_id")
                        .table(ExchangeGuides::Table)
                        .col(ExchangeGuides::SupplierId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_exchange_guides_guide_date")
                        .table(ExchangeGuides::Table)
                        .col(ExchangeGuides::GuideDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ExchangeGuideLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ExchangeGuideLines::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ExchangeGuideLines::GuideNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ExchangeGuideLines::ProductCode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ExchangeGuideLines::LotCode)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ExchangeGuideLines::Expiry).date().null())
                        .col(
                            ColumnDef::new(ExchangeGuideLines::Quantity)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ExchangeGuideLines::ReturnGuideNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ExchangeGuideLines::Reference)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ExchangeGuideLines::DocType)
                                .integer()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_exchange_guide_lines_guide_number")
                        .table(ExchangeGuideLines::Table)
                        .col(ExchangeGuideLines::GuideNumber)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_exchange_guide_lines_return_guide")
                        .table(ExchangeGuideLines::Table)
                        .col(ExchangeGuideLines::ReturnGuideNumber)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_exchange_guide_lines_product_lot")
                        .table(ExchangeGuideLines::Table)
                        .col(ExchangeGuideLines::ProductCode)
                        .col(ExchangeGuideLines::LotCode)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ExchangeGuideLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ExchangeGuides::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ExchangeGuides {
        Table,
        Number,
        GuideDate,
        SupplierId,
        TransportCompany,
        TransportTaxId,
        VehiclePlate,
        ArrivalPoint,
        Addressee,
        Deleted,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum ExchangeGuideLines {
        Table,
        Id,
        GuideNumber,
        ProductCode,
        LotCode,
        Expiry,
        Quantity,
        ReturnGuideNumber,
        Reference,
        DocType,
    }
}

mod m20240101_000005_create_return_guide_lines_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_return_guide_lines_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ReturnGuideLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ReturnGuideLines::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReturnGuideLines::ReturnGuideNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReturnGuideLines::SupplierId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReturnGuideLines::ProductCode)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ReturnGuideLines::LotCode).string().not_null())
                        .col(
                            ColumnDef::new(ReturnGuideLines::Quantity)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReturnGuideLines::Reference)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReturnGuideLines::DocType)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReturnGuideLines::MatchScope)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReturnGuideLines::Processed)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_return_guide_lines_return_guide")
                        .table(ReturnGuideLines::Table)
                        .col(ReturnGuideLines::ReturnGuideNumber)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_return_guide_lines_supplier_processed")
                        .table(ReturnGuideLines::Table)
                        .col(ReturnGuideLines::SupplierId)
                        .col(ReturnGuideLines::Processed)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_return_guide_lines_product_lot")
                        .table(ReturnGuideLines::Table)
                        .col(ReturnGuideLines::ProductCode)
                        .col(ReturnGuideLines::LotCode)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ReturnGuideLines::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ReturnGuideLines {
        Table,
        Id,
        ReturnGuideNumber,
        SupplierId,
        ProductCode,
        LotCode,
        Quantity,
        Reference,
        DocType,
        MatchScope,
        Processed,
    }
}

mod m20240101_000006_create_dispatch_guides_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_dispatch_guides_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DispatchGuides::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DispatchGuides::Number)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DispatchGuides::SaleDocument)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DispatchGuides::DocType).integer().not_null())
                        .col(ColumnDef::new(DispatchGuides::GuideDate).date().not_null())
                        .col(
                            ColumnDef::new(DispatchGuides::TransportCompany)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DispatchGuides::TransportTaxId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DispatchGuides::VehiclePlate)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DispatchGuides::Destination)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DispatchGuides::GrossWeightKg)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(DispatchGuides::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_dispatch_guides_sale_document")
                        .table(DispatchGuides::Table)
                        .col(DispatchGuides::SaleDocument)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_dispatch_guides_guide_date")
                        .table(DispatchGuides::Table)
                        .col(DispatchGuides::GuideDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DispatchGuides::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DispatchGuides {
        Table,
        Number,
        SaleDocument,
        DocType,
        GuideDate,
        TransportCompany,
        TransportTaxId,
        VehiclePlate,
        Destination,
        GrossWeightKg,
        CreatedAt,
    }
}

mod m20240101_000007_create_movement_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_movement_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Movements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Movements::Number)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Movements::MovementDate).date().not_null())
                        .col(ColumnDef::new(Movements::WarehouseId).integer().not_null())
                        .col(ColumnDef::new(Movements::Direction).string().not_null())
                        .col(ColumnDef::new(Movements::Concept).string().not_null())
                        .col(ColumnDef::new(Movements::Reference).string().null())
                        .col(
                            ColumnDef::new(Movements::Spoilage)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Movements::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_movements_movement_date")
                        .table(Movements::Table)
                        .col(Movements::MovementDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MovementLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MovementLines::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MovementLines::MovementNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MovementLines::ProductCode)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MovementLines::LotCode).string().not_null())
                        .col(
                            ColumnDef::new(MovementLines::Quantity)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MovementLines::UnitCost)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MovementLines::UnitPrice)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_movement_lines_movement_number")
                        .table(MovementLines::Table)
                        .col(MovementLines::MovementNumber)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MovementLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Movements::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Movements {
        Table,
        Number,
        MovementDate,
        WarehouseId,
        Direction,
        Concept,
        Reference,
        Spoilage,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum MovementLines {
        Table,
        Id,
        MovementNumber,
        ProductCode,
        LotCode,
        Quantity,
        UnitCost,
        UnitPrice,
    }
}

mod m20240101_000008_create_sequence_counters_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_sequence_counters_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SequenceCounters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SequenceCounters::Code)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SequenceCounters::Value).string().not_null())
                        .col(
                            ColumnDef::new(SequenceCounters::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SequenceCounters::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Seed one row per document family so allocation never has to
            // create counter rows on the fly.
            let seed = Query::insert()
                .into_table(SequenceCounters::Table)
                .columns([
                    SequenceCounters::Code,
                    SequenceCounters::Value,
                    SequenceCounters::Description,
                    SequenceCounters::UpdatedAt,
                ])
                .values_panic([
                    "exchange_guide".into(),
                    "FF01-000000".into(),
                    "Exchange guide numbers".into(),
                    Expr::current_timestamp().into(),
                ])
                .values_panic([
                    "dispatch_guide".into(),
                    "T002-000000".into(),
                    "Dispatch guide numbers".into(),
                    Expr::current_timestamp().into(),
                ])
                .values_panic([
                    "warehouse_movement".into(),
                    "MV01-000000".into(),
                    "Warehouse movement numbers".into(),
                    Expr::current_timestamp().into(),
                ])
                .to_owned();
            manager.exec_stmt(seed).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SequenceCounters::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SequenceCounters {
        Table,
        Code,
        Value,
        Description,
        UpdatedAt,
    }
}

mod m20240101_000009_create_audit_trail_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000009_create_audit_trail_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AuditTrail::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AuditTrail::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AuditTrail::OccurredAt).timestamp().not_null())
                        .col(ColumnDef::new(AuditTrail::Action).string().not_null())
                        .col(
                            ColumnDef::new(AuditTrail::DocumentNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AuditTrail::Detail).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_audit_trail_document_number")
                        .table(AuditTrail::Table)
                        .col(AuditTrail::DocumentNumber)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AuditTrail::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum AuditTrail {
        Table,
        Id,
        OccurredAt,
        Action,
        DocumentNumber,
        Detail,
    }
}

pub async fn run_migration(db_url: &str) -> Result<()> {
    info!("Setting up database connection for migrations");

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;

    info!("Running database migrations");

    let result = Migrator::up(&db, None).await;

    match result {
        Ok(_) => {
            info!("Migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Migration failed: {}", e);
            Err(e.into())
        }
    }
}
