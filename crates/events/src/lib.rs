//! Ephemeral inter-actor messaging.
//!
//! Messages live only inside the bus: they are never persisted and do not
//! survive a simulation reset.

pub mod bus;
pub mod in_memory_bus;
pub mod message;

pub use bus::MessageBus;
pub use in_memory_bus::InMemoryMessageBus;
pub use message::{Message, Payload, PurchaseRequested, RestockRequested, payload_from, topics};
