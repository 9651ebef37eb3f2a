//! Store vocabulary: entity kinds, fact values and property names.

use serde::{Deserialize, Serialize};

use crate::store::KnowledgeStore;

/// Class of an entity in the store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Book,
    Inventory,
    Customer,
    Employee,
    Order,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Book,
        EntityKind::Inventory,
        EntityKind::Customer,
        EntityKind::Employee,
        EntityKind::Order,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Book => "Book",
            EntityKind::Inventory => "Inventory",
            EntityKind::Customer => "Customer",
            EntityKind::Employee => "Employee",
            EntityKind::Order => "Order",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to an entity: its class plus its unique name within that class.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub name: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl core::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}({})", self.kind, self.name)
    }
}

/// Value of a data property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FactValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FactValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view; whole floats are accepted.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FactValue::Int(i) => Some(*i),
            FactValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FactValue::Float(f) => Some(*f),
            FactValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Bool(value)
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        FactValue::Int(value)
    }
}

impl From<f64> for FactValue {
    fn from(value: f64) -> Self {
        FactValue::Float(value)
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Text(value)
    }
}

/// Property names used by the bookstore schema.
pub mod vocab {
    // Book data properties.
    pub const HAS_TITLE: &str = "HasTitle";
    pub const HAS_AUTHOR: &str = "HasAuthor";
    pub const HAS_GENRE: &str = "HasGenre";
    pub const HAS_PRICE: &str = "HasPrice";

    // Book <-> Inventory.
    pub const HAS_INVENTORY: &str = "HasInventory";
    pub const TRACKS_BOOK: &str = "TracksBook";

    // Inventory data properties.
    pub const AVAILABLE_QUANTITY: &str = "AvailableQuantity";
    pub const LOW_THRESHOLD: &str = "LowThreshold";
    pub const NEEDS_RESTOCK: &str = "NeedsRestock";

    // Customers and orders.
    pub const HAS_BUDGET: &str = "HasBudget";
    pub const PURCHASES: &str = "Purchases";
    pub const HAS_PURCHASED: &str = "HasPurchased";
    pub const ORDERED_BY: &str = "OrderedBy";
    pub const ORDERED_BOOK: &str = "OrderedBook";

    // Employees.
    pub const WORKS_AT: &str = "WorksAt";
}

/// Return the inventory entity linked to `book`, creating and linking one if missing.
///
/// Lookup order: the book's `HasInventory` link, then any inventory whose
/// `TracksBook` points at the book, then a fresh `inv_<isbn>` entity.
pub fn ensure_inventory_for<S>(store: &mut S, book: &EntityRef) -> EntityRef
where
    S: KnowledgeStore + ?Sized,
{
    if let Some(existing) = store.related(book, vocab::HAS_INVENTORY).into_iter().next() {
        return existing;
    }

    let tracking = store
        .instances(EntityKind::Inventory)
        .into_iter()
        .find(|inv| store.related(inv, vocab::TRACKS_BOOK).contains(book));

    let inventory = match tracking {
        Some(inv) => inv,
        None => store.resolve_or_create(EntityKind::Inventory, &format!("inv_{}", book.name)),
    };
    store.assert_relation(book, vocab::HAS_INVENTORY, &inventory);
    store.assert_relation(&inventory, vocab::TRACKS_BOOK, book);
    inventory
}
