//! Purchase processing.
//!
//! Drains purchase requests published by customers, applies them to the
//! inventory ledger and records order history, both in memory and as facts
//! in the knowledge store. This is the only place order ids are minted.

pub mod processor;
pub mod sequence;

pub use processor::{PurchaseProcessor, PurchaseRecord};
pub use sequence::OrderSequence;
