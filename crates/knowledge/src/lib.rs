//! `bookstore-knowledge`
//!
//! **Responsibility:** the fact base behind the simulation.
//!
//! The simulation core talks to the store only through [`KnowledgeStore`]:
//! idempotent entity resolution, attribute/relation assertions, on-demand
//! rule inference and durable persistence. [`InMemoryKnowledgeStore`] is a
//! mapping-table backend with a pluggable [`Reasoner`].

pub mod facts;
pub mod in_memory;
pub mod persist;
pub mod reasoner;
pub mod schema;
pub mod store;

pub use facts::{EntityRecord, FactBase};
pub use in_memory::InMemoryKnowledgeStore;
pub use reasoner::{
    Comparison, InferenceReport, Reasoner, ReasonerError, Rule, RuleReasoner, UnavailableReasoner,
};
pub use schema::{EntityKind, EntityRef, FactValue, ensure_inventory_for, vocab};
pub use store::{KnowledgeStore, StoreError};
