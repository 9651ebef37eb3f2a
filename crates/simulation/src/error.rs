use thiserror::Error;

use bookstore_knowledge::StoreError;

/// Errors surfaced by the simulation facade.
///
/// Unknown entities and reasoner failures never reach this type: the first
/// are discarded at the point of use, the second degrade to heuristic mode.
#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected before any tick ran; nothing was mutated.
    #[error("validation error: {0}")]
    Validation(String),

    /// Durable save failed. Treated as fatal by callers.
    #[error("persistence failed: {0}")]
    Persistence(#[source] StoreError),

    #[error("knowledge store error: {0}")]
    Store(#[source] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SimError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
