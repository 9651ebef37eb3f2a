use std::path::PathBuf;

use thiserror::Error;

use crate::reasoner::{InferenceReport, ReasonerError};
use crate::schema::{EntityKind, EntityRef, FactValue};

/// Failures of the durable side of the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store has no storage path configured")]
    NoStoragePath,

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode store: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("persisted store at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Knowledge store capability consumed by the simulation core.
///
/// Implementations may be a description-logic engine or a plain mapping
/// table; the core only relies on the contract below.
///
/// ## Contract
///
/// - `resolve_or_create` is idempotent per `(kind, name)`.
/// - Data properties are functional: `assert_attribute` replaces.
/// - Relations are sets: `assert_relation` ignores an existing edge.
/// - `instances` yields entities in creation order.
/// - `run_inference` materialises rule consequences in place and may fail if
///   the reasoner is unavailable; the fact base is left untouched on failure.
/// - All calls are blocking.
pub trait KnowledgeStore: Send {
    fn resolve_or_create(&mut self, kind: EntityKind, name: &str) -> EntityRef;

    fn find(&self, kind: EntityKind, name: &str) -> Option<EntityRef>;

    fn instances(&self, kind: EntityKind) -> Vec<EntityRef>;

    fn count(&self, kind: EntityKind) -> usize {
        self.instances(kind).len()
    }

    fn assert_attribute(&mut self, subject: &EntityRef, attribute: &str, value: FactValue);

    fn attribute(&self, subject: &EntityRef, attribute: &str) -> Option<FactValue>;

    fn assert_relation(&mut self, subject: &EntityRef, relation: &str, object: &EntityRef);

    fn related(&self, subject: &EntityRef, relation: &str) -> Vec<EntityRef>;

    fn run_inference(&mut self) -> Result<InferenceReport, ReasonerError>;

    /// Durably save the current facts and return where they were written.
    fn persist(&self) -> Result<PathBuf, StoreError>;
}

impl<S> KnowledgeStore for Box<S>
where
    S: KnowledgeStore + ?Sized,
{
    fn resolve_or_create(&mut self, kind: EntityKind, name: &str) -> EntityRef {
        (**self).resolve_or_create(kind, name)
    }

    fn find(&self, kind: EntityKind, name: &str) -> Option<EntityRef> {
        (**self).find(kind, name)
    }

    fn instances(&self, kind: EntityKind) -> Vec<EntityRef> {
        (**self).instances(kind)
    }

    fn count(&self, kind: EntityKind) -> usize {
        (**self).count(kind)
    }

    fn assert_attribute(&mut self, subject: &EntityRef, attribute: &str, value: FactValue) {
        (**self).assert_attribute(subject, attribute, value)
    }

    fn attribute(&self, subject: &EntityRef, attribute: &str) -> Option<FactValue> {
        (**self).attribute(subject, attribute)
    }

    fn assert_relation(&mut self, subject: &EntityRef, relation: &str, object: &EntityRef) {
        (**self).assert_relation(subject, relation, object)
    }

    fn related(&self, subject: &EntityRef, relation: &str) -> Vec<EntityRef> {
        (**self).related(subject, relation)
    }

    fn run_inference(&mut self) -> Result<InferenceReport, ReasonerError> {
        (**self).run_inference()
    }

    fn persist(&self) -> Result<PathBuf, StoreError> {
        (**self).persist()
    }
}
