//! Bookstore simulation: actors, the tick coordinator and the service facade.
//!
//! A [`Simulation`] owns one run's complete mutable state (store, bus,
//! ledger, logs, counters); [`SimulationManager`] wraps it with persistence,
//! batch validation and reset for the HTTP and CLI front ends.

pub mod actors;
pub mod config;
pub mod error;
pub mod manager;
pub mod report;
pub mod seed;
pub mod simulation;

pub use actors::{Actor, CustomerActor, EmployeeActor};
pub use config::{AppConfig, BudgetMode, ReasonerKind, SimulationSettings, StoreSettings};
pub use error::SimError;
pub use manager::SimulationManager;
pub use report::{CustomerSummary, InventoryLine, Report, RestockLine};
pub use seed::{BookSeed, CustomerProfile};
pub use simulation::Simulation;

pub use bookstore_inventory::InventoryRow;
pub use bookstore_purchasing::RestockRecord;
pub use bookstore_sales::PurchaseRecord;
