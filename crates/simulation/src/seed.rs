//! Seed data and store bootstrap.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use bookstore_knowledge::{
    EntityKind, FactValue, InMemoryKnowledgeStore, KnowledgeStore, StoreError, ensure_inventory_for, vocab,
};

use crate::config::AppConfig;
use crate::error::SimError;

const SAMPLE_INVENTORY: &str = include_str!("../data/sample_inventory.json");

/// One book in a seed inventory file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSeed {
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub low_threshold: Option<i64>,
}

/// A configured customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    #[serde(alias = "customer_id", alias = "name")]
    pub id: String,
    #[serde(default)]
    pub budget: Option<f64>,
}

/// The bundled sample inventory.
pub fn sample_inventory() -> Result<Vec<BookSeed>, SimError> {
    serde_json::from_str(SAMPLE_INVENTORY).map_err(|e| SimError::config(format!("bundled inventory: {e}")))
}

pub fn read_inventory(path: &Path) -> Result<Vec<BookSeed>, SimError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SimError::config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text).map_err(|e| SimError::config(format!("invalid inventory {}: {e}", path.display())))
}

/// Create book and inventory entities for `books`.
pub fn add_inventory<S>(store: &mut S, books: &[BookSeed], default_threshold: u32)
where
    S: KnowledgeStore + ?Sized,
{
    for record in books {
        let isbn = record.isbn.trim();
        if isbn.is_empty() {
            continue;
        }
        let book = store.resolve_or_create(EntityKind::Book, isbn);
        store.assert_attribute(&book, vocab::HAS_TITLE, FactValue::from(record.title.as_str()));
        store.assert_attribute(&book, vocab::HAS_AUTHOR, FactValue::from(record.author.as_str()));
        store.assert_attribute(&book, vocab::HAS_GENRE, FactValue::from(record.genre.as_str()));
        store.assert_attribute(&book, vocab::HAS_PRICE, FactValue::Float(record.price.max(0.0)));

        let quantity = record.quantity.max(0);
        let threshold = record.low_threshold.unwrap_or(i64::from(default_threshold)).max(0);
        let inventory = ensure_inventory_for(store, &book);
        store.assert_attribute(&inventory, vocab::AVAILABLE_QUANTITY, FactValue::Int(quantity));
        store.assert_attribute(&inventory, vocab::LOW_THRESHOLD, FactValue::Int(threshold));
        store.assert_attribute(&inventory, vocab::NEEDS_RESTOCK, FactValue::Bool(quantity < threshold));
    }
}

/// Create customer entities with budgets. Returns `true` if anything changed.
pub fn add_customers<S>(store: &mut S, profiles: &[CustomerProfile], default_budget: f64) -> bool
where
    S: KnowledgeStore + ?Sized,
{
    let mut updated = false;
    for profile in profiles {
        let id = profile.id.trim();
        if id.is_empty() {
            continue;
        }
        let customer = store.resolve_or_create(EntityKind::Customer, &id.replace("::", "_"));
        let budget = profile.budget.unwrap_or(default_budget);
        let current = store.attribute(&customer, vocab::HAS_BUDGET).and_then(|v| v.as_float());
        if current != Some(budget) {
            store.assert_attribute(&customer, vocab::HAS_BUDGET, FactValue::Float(budget));
            updated = true;
        }
    }
    updated
}

/// Load the persisted store, or bootstrap and persist a fresh one.
///
/// A corrupt store file is replaced by a fresh bootstrap; any other IO
/// failure is an error.
pub fn open_store(config: &AppConfig) -> Result<InMemoryKnowledgeStore, SimError> {
    let path = &config.store.path;
    let mut store = if path.exists() {
        match InMemoryKnowledgeStore::load(path) {
            Ok(store) => {
                info!(path = %path.display(), "loaded knowledge store");
                store
            }
            Err(StoreError::Corrupt { reason, .. }) => {
                warn!(path = %path.display(), %reason, "persisted store is corrupt; bootstrapping from seed data");
                bootstrap(config)?
            }
            Err(err) => return Err(SimError::Store(err)),
        }
    } else {
        bootstrap(config)?
    };

    let settings = &config.simulation;
    if add_customers(&mut store, &settings.customers, settings.customer_budget) {
        store.persist().map_err(SimError::Persistence)?;
    }
    Ok(store.with_reasoner(settings.reasoner.build()))
}

/// Fresh store populated from seed data and saved to the configured path.
pub fn bootstrap(config: &AppConfig) -> Result<InMemoryKnowledgeStore, SimError> {
    let books = match &config.store.seed_inventory {
        Some(path) => read_inventory(path)?,
        None => sample_inventory()?,
    };
    let mut store =
        InMemoryKnowledgeStore::new(config.store.iri.clone()).with_storage_path(config.store.path.clone());
    add_inventory(&mut store, &books, config.simulation.restock_threshold);
    let path = store.persist().map_err(SimError::Persistence)?;
    info!(path = %path.display(), books = books.len(), "bootstrapped knowledge store");
    Ok(store)
}
