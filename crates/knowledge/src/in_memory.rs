use std::path::{Path, PathBuf};

use crate::facts::FactBase;
use crate::persist;
use crate::reasoner::{InferenceReport, Reasoner, ReasonerError, RuleReasoner};
use crate::schema::{EntityKind, EntityRef, FactValue};
use crate::store::{KnowledgeStore, StoreError};

/// Mapping-table knowledge store with optional file persistence.
pub struct InMemoryKnowledgeStore {
    iri: String,
    storage_path: Option<PathBuf>,
    facts: FactBase,
    reasoner: Box<dyn Reasoner>,
}

impl core::fmt::Debug for InMemoryKnowledgeStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryKnowledgeStore")
            .field("iri", &self.iri)
            .field("storage_path", &self.storage_path)
            .field("entities", &self.facts.len())
            .field("reasoner", &self.reasoner.name())
            .finish()
    }
}

impl InMemoryKnowledgeStore {
    /// Empty store using the default rule reasoner and no storage path.
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            storage_path: None,
            facts: FactBase::new(),
            reasoner: Box::new(RuleReasoner::default()),
        }
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    pub fn with_reasoner(mut self, reasoner: Box<dyn Reasoner>) -> Self {
        self.reasoner = reasoner;
        self
    }

    /// Load a previously persisted store; later `persist` calls write back to `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let document = persist::load(path)?;
        tracing::info!(
            path = %path.display(),
            entities = document.entities.len(),
            saved_at = %document.saved_at,
            "knowledge store loaded"
        );
        Ok(Self {
            iri: document.iri,
            storage_path: Some(path.to_path_buf()),
            facts: FactBase::from_records(document.entities),
            reasoner: Box::new(RuleReasoner::default()),
        })
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn storage_path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }

    pub fn reasoner_name(&self) -> &str {
        self.reasoner.name()
    }

    pub fn facts(&self) -> &FactBase {
        &self.facts
    }
}

impl KnowledgeStore for InMemoryKnowledgeStore {
    fn resolve_or_create(&mut self, kind: EntityKind, name: &str) -> EntityRef {
        self.facts.ensure(kind, name);
        EntityRef::new(kind, name)
    }

    fn find(&self, kind: EntityKind, name: &str) -> Option<EntityRef> {
        let entity = EntityRef::new(kind, name);
        self.facts.contains(&entity).then_some(entity)
    }

    fn instances(&self, kind: EntityKind) -> Vec<EntityRef> {
        self.facts.of_kind(kind).map(|r| r.entity_ref()).collect()
    }

    fn count(&self, kind: EntityKind) -> usize {
        self.facts.of_kind(kind).count()
    }

    fn assert_attribute(&mut self, subject: &EntityRef, attribute: &str, value: FactValue) {
        self.facts.set_attribute(subject, attribute, value);
    }

    fn attribute(&self, subject: &EntityRef, attribute: &str) -> Option<FactValue> {
        self.facts.attribute(subject, attribute).cloned()
    }

    fn assert_relation(&mut self, subject: &EntityRef, relation: &str, object: &EntityRef) {
        self.facts.add_relation(subject, relation, object);
    }

    fn related(&self, subject: &EntityRef, relation: &str) -> Vec<EntityRef> {
        self.facts.related(subject, relation).to_vec()
    }

    fn run_inference(&mut self) -> Result<InferenceReport, ReasonerError> {
        let report = self.reasoner.infer(&mut self.facts)?;
        tracing::debug!(
            reasoner = self.reasoner.name(),
            rounds = report.rounds,
            derived = report.derived,
            "inference complete"
        );
        Ok(report)
    }

    fn persist(&self) -> Result<PathBuf, StoreError> {
        let path = self.storage_path.as_deref().ok_or(StoreError::NoStoragePath)?;
        persist::save(path, &self.iri, &self.facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reasoner::UnavailableReasoner;
    use crate::schema::{ensure_inventory_for, vocab};

    const IRI: &str = "http://example.org/bookstore";

    #[test]
    fn resolve_or_create_is_idempotent() {
        let mut store = InMemoryKnowledgeStore::new(IRI);
        let a = store.resolve_or_create(EntityKind::Customer, "customer_0");
        let b = store.resolve_or_create(EntityKind::Customer, "customer_0");
        assert_eq!(a, b);
        assert_eq!(store.count(EntityKind::Customer), 1);
        assert_eq!(store.find(EntityKind::Customer, "customer_1"), None);
    }

    #[test]
    fn ensure_inventory_links_both_directions_once() {
        let mut store = InMemoryKnowledgeStore::new(IRI);
        let book = store.resolve_or_create(EntityKind::Book, "A");

        let inv = ensure_inventory_for(&mut store, &book);
        assert_eq!(inv.name, "inv_A");
        assert_eq!(ensure_inventory_for(&mut store, &book), inv);
        assert_eq!(store.related(&inv, vocab::TRACKS_BOOK), vec![book.clone()]);
        assert_eq!(store.count(EntityKind::Inventory), 1);
    }

    #[test]
    fn ensure_inventory_adopts_legacy_tracking_entity() {
        let mut store = InMemoryKnowledgeStore::new(IRI);
        let book = store.resolve_or_create(EntityKind::Book, "A");
        let legacy = store.resolve_or_create(EntityKind::Inventory, "stock_for_a");
        store.assert_relation(&legacy, vocab::TRACKS_BOOK, &book);

        assert_eq!(ensure_inventory_for(&mut store, &book), legacy);
        assert_eq!(store.related(&book, vocab::HAS_INVENTORY), vec![legacy]);
    }

    #[test]
    fn persist_without_path_is_an_error() {
        let store = InMemoryKnowledgeStore::new(IRI);
        assert!(matches!(store.persist(), Err(StoreError::NoStoragePath)));
    }

    #[test]
    fn persist_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = InMemoryKnowledgeStore::new(IRI).with_storage_path(&path);
        let book = store.resolve_or_create(EntityKind::Book, "A");
        store.assert_attribute(&book, vocab::HAS_PRICE, FactValue::Float(10.0));
        let inv = ensure_inventory_for(&mut store, &book);
        store.assert_attribute(&inv, vocab::AVAILABLE_QUANTITY, FactValue::Int(3));
        store.assert_attribute(&inv, vocab::NEEDS_RESTOCK, FactValue::Bool(true));

        assert_eq!(store.persist().unwrap(), path);

        let loaded = InMemoryKnowledgeStore::load(&path).unwrap();
        assert_eq!(loaded.iri(), IRI);
        assert_eq!(loaded.storage_path(), Some(path.as_path()));
        assert_eq!(loaded.facts().records(), store.facts().records());
        assert_eq!(loaded.attribute(&book, vocab::HAS_PRICE), Some(FactValue::Float(10.0)));
    }

    #[test]
    fn loading_garbage_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{not json").unwrap();

        assert!(matches!(
            InMemoryKnowledgeStore::load(&path),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn failed_inference_keeps_facts() {
        let mut store = InMemoryKnowledgeStore::new(IRI)
            .with_reasoner(Box::new(UnavailableReasoner::default()));
        let inv = store.resolve_or_create(EntityKind::Inventory, "inv_A");
        store.assert_attribute(&inv, vocab::AVAILABLE_QUANTITY, FactValue::Int(0));
        store.assert_attribute(&inv, vocab::LOW_THRESHOLD, FactValue::Int(5));

        assert!(store.run_inference().is_err());
        assert_eq!(store.attribute(&inv, vocab::NEEDS_RESTOCK), None);
    }
}
