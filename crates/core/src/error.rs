//! Domain error model.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures raised while building domain values.
///
/// Store and reasoner failures have their own types in `bookstore-knowledge`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value was out of range or malformed (negative price, NaN budget).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was empty or did not match its expected shape.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The same identity was registered twice.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
