//! Restock coordination.
//!
//! Decides which inventory rows need replenishment (from inferred facts when
//! the reasoner works, from the procedural threshold check when it does not),
//! publishes deduplicated restock requests, and fulfils them on behalf of
//! employees.

pub mod coordinator;

pub use coordinator::{ReasonerMode, RestockCoordinator, RestockRecord, SyncOutcome};
