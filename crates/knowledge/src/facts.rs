//! Entity/fact tables shared by the in-memory store and its reasoners.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::schema::{EntityKind, EntityRef, FactValue};

/// One entity with its data properties and outgoing relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, FactValue>,
    #[serde(default)]
    pub relations: BTreeMap<String, Vec<EntityRef>>,
}

impl EntityRecord {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            attributes: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind, self.name.clone())
    }
}

/// Insertion-ordered entity table with a `(kind, name)` index.
///
/// Data properties are functional: asserting one replaces the previous value.
/// Relations are sets: asserting an existing edge is a no-op.
#[derive(Debug, Clone, Default)]
pub struct FactBase {
    records: Vec<EntityRecord>,
    index: HashMap<(EntityKind, String), usize>,
}

impl FactBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records; later duplicates of an entity are merged into the first.
    pub fn from_records(records: Vec<EntityRecord>) -> Self {
        let mut base = Self::new();
        for record in records {
            let slot = base.ensure(record.kind, &record.name);
            let target = &mut base.records[slot];
            target.attributes.extend(record.attributes);
            for (relation, objects) in record.relations {
                let edges = target.relations.entry(relation).or_default();
                for object in objects {
                    if !edges.contains(&object) {
                        edges.push(object);
                    }
                }
            }
        }
        base
    }

    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn slot(&self, kind: EntityKind, name: &str) -> Option<usize> {
        self.index.get(&(kind, name.to_string())).copied()
    }

    /// Index of the entity, creating it if absent.
    pub fn ensure(&mut self, kind: EntityKind, name: &str) -> usize {
        if let Some(slot) = self.slot(kind, name) {
            return slot;
        }
        let slot = self.records.len();
        self.records.push(EntityRecord::new(kind, name));
        self.index.insert((kind, name.to_string()), slot);
        slot
    }

    pub fn get(&self, entity: &EntityRef) -> Option<&EntityRecord> {
        self.slot(entity.kind, &entity.name).map(|slot| &self.records[slot])
    }

    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.slot(entity.kind, &entity.name).is_some()
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &EntityRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    pub fn attribute(&self, entity: &EntityRef, attribute: &str) -> Option<&FactValue> {
        self.get(entity)?.attributes.get(attribute)
    }

    /// Set a data property. Returns `true` when the stored value changed.
    pub fn set_attribute(&mut self, entity: &EntityRef, attribute: &str, value: FactValue) -> bool {
        let slot = self.ensure(entity.kind, &entity.name);
        let attributes = &mut self.records[slot].attributes;
        if attributes.get(attribute) == Some(&value) {
            return false;
        }
        attributes.insert(attribute.to_string(), value);
        true
    }

    pub fn related(&self, entity: &EntityRef, relation: &str) -> &[EntityRef] {
        self.get(entity)
            .and_then(|r| r.relations.get(relation))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Add a relation edge (both ends are created if absent). Returns `true` when added.
    pub fn add_relation(&mut self, subject: &EntityRef, relation: &str, object: &EntityRef) -> bool {
        self.ensure(object.kind, &object.name);
        let slot = self.ensure(subject.kind, &subject.name);
        let edges = self.records[slot].relations.entry(relation.to_string()).or_default();
        if edges.contains(object) {
            return false;
        }
        edges.push(object.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(name: &str) -> EntityRef {
        EntityRef::new(EntityKind::Book, name)
    }

    #[test]
    fn ensure_is_idempotent_and_ordered() {
        let mut base = FactBase::new();
        assert_eq!(base.ensure(EntityKind::Book, "b"), 0);
        assert_eq!(base.ensure(EntityKind::Book, "a"), 1);
        assert_eq!(base.ensure(EntityKind::Book, "b"), 0);
        assert_eq!(base.ensure(EntityKind::Customer, "b"), 2);

        let names: Vec<_> = base.of_kind(EntityKind::Book).map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn attributes_replace_and_report_change() {
        let mut base = FactBase::new();
        assert!(base.set_attribute(&book("a"), "HasPrice", FactValue::Float(3.0)));
        assert!(!base.set_attribute(&book("a"), "HasPrice", FactValue::Float(3.0)));
        assert!(base.set_attribute(&book("a"), "HasPrice", FactValue::Float(4.0)));
        assert_eq!(base.attribute(&book("a"), "HasPrice"), Some(&FactValue::Float(4.0)));
    }

    #[test]
    fn relations_are_sets() {
        let mut base = FactBase::new();
        let c = EntityRef::new(EntityKind::Customer, "c");
        assert!(base.add_relation(&c, "Purchases", &book("a")));
        assert!(!base.add_relation(&c, "Purchases", &book("a")));
        assert!(base.contains(&book("a")));
        assert_eq!(base.related(&c, "Purchases"), &[book("a")]);
        assert!(base.related(&c, "HasPurchased").is_empty());
    }

    #[test]
    fn from_records_merges_duplicates() {
        let mut first = EntityRecord::new(EntityKind::Book, "a");
        first.attributes.insert("HasTitle".into(), FactValue::from("A"));
        let mut second = EntityRecord::new(EntityKind::Book, "a");
        second.attributes.insert("HasPrice".into(), FactValue::Float(1.0));

        let base = FactBase::from_records(vec![first, second]);
        assert_eq!(base.len(), 1);
        assert!(base.attribute(&book("a"), "HasTitle").is_some());
        assert!(base.attribute(&book("a"), "HasPrice").is_some());
    }
}
