//! Inventory ledger.
//!
//! The ledger is the in-process projection of book/inventory facts: actors
//! read it, the purchase processor and employees mutate it, and every
//! mutation is written straight back to the knowledge store.

pub mod ledger;
pub mod pending;
pub mod row;

pub use ledger::InventoryLedger;
pub use pending::PendingRestockSet;
pub use row::InventoryRow;
