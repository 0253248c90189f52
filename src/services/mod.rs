// Transaction coordinators
pub mod exchanges;
pub mod movements;

// Shared in-transaction building blocks
pub mod returns_matching;
pub mod sequences;
pub mod stock;

// Supporting services
pub mod audit;
pub mod counters;
pub mod inventory;
