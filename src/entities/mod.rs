pub mod audit_trail;
pub mod dispatch_guide;
pub mod exchange_guide;
pub mod exchange_guide_line;
pub mod ledger_entry;
pub mod lot_balance;
pub mod movement;
pub mod movement_line;
pub mod product;
pub mod return_guide_line;
pub mod sequence_counter;
