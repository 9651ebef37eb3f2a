use std::collections::HashMap;

use bookstore_core::{DomainError, DomainResult, Isbn, Money};
use bookstore_knowledge::{EntityKind, EntityRef, FactValue, KnowledgeStore, ensure_inventory_for, vocab};
use tracing::warn;

use crate::pending::PendingRestockSet;
use crate::row::{InventoryRow, UNKNOWN_GENRE};

#[derive(Debug, Clone)]
struct StoreHandles {
    book: EntityRef,
    inventory: EntityRef,
}

/// In-process projection of every book's stock, plus the pending restock set.
///
/// Rows keep insertion order so that reads, purchase policies and reports all
/// see books in the same order the store created them.
#[derive(Debug, Default)]
pub struct InventoryLedger {
    rows: Vec<InventoryRow>,
    index: HashMap<Isbn, usize>,
    handles: HashMap<Isbn, StoreHandles>,
    pending: PendingRestockSet,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the ledger from every `Book` entity in the store.
    ///
    /// Missing inventory facts are filled in (quantity 0, `default_threshold`)
    /// and written back so the store and ledger agree from the first tick.
    pub fn load_from_store<S>(store: &mut S, default_threshold: u32) -> Self
    where
        S: KnowledgeStore + ?Sized,
    {
        let mut ledger = Self::new();
        for book in store.instances(EntityKind::Book) {
            let isbn = match Isbn::new(book.name.clone()) {
                Ok(isbn) => isbn,
                Err(_) => continue,
            };
            let inventory = ensure_inventory_for(store, &book);

            let title = text_attr(store, &book, vocab::HAS_TITLE).unwrap_or_else(|| isbn.to_string());
            let genre = text_attr(store, &book, vocab::HAS_GENRE).unwrap_or_else(|| UNKNOWN_GENRE.to_string());
            let unit_price = store
                .attribute(&book, vocab::HAS_PRICE)
                .and_then(|v| v.as_float())
                .and_then(|p| Money::from_major(p).ok())
                .unwrap_or(Money::ZERO);
            let quantity = count_attr(store, &inventory, vocab::AVAILABLE_QUANTITY).unwrap_or(0);
            let low_threshold = count_attr(store, &inventory, vocab::LOW_THRESHOLD).unwrap_or(default_threshold);

            let mut row = InventoryRow::new(isbn.clone(), title, unit_price, quantity, low_threshold).with_genre(genre);
            if let Some(flag) = store.attribute(&inventory, vocab::NEEDS_RESTOCK).and_then(|v| v.as_bool()) {
                row.needs_restock = flag;
            }

            ledger.handles.insert(isbn.clone(), StoreHandles { book, inventory });
            ledger.write_back(&row, store);
            if ledger.insert(row).is_err() {
                warn!(%isbn, "duplicate book entity ignored");
            }
        }
        ledger
    }

    /// Add a row. Each ISBN appears at most once.
    pub fn insert(&mut self, row: InventoryRow) -> DomainResult<()> {
        if self.index.contains_key(&row.isbn) {
            return Err(DomainError::conflict(format!("inventory row for {} already exists", row.isbn)));
        }
        self.index.insert(row.isbn.clone(), self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    pub fn get(&self, isbn: &Isbn) -> Option<&InventoryRow> {
        self.index.get(isbn).map(|&slot| &self.rows[slot])
    }

    /// Read-only view of every row, in insertion order.
    pub fn snapshot(&self) -> &[InventoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn pending(&self) -> &PendingRestockSet {
        &self.pending
    }

    pub fn is_pending(&self, isbn: &Isbn) -> bool {
        self.pending.contains(isbn)
    }

    /// Record that a restock request for `isbn` is in flight.
    ///
    /// Returns `false` if one already was.
    pub fn mark_pending(&mut self, isbn: &Isbn) -> bool {
        self.pending.insert(isbn.clone())
    }

    /// Decrement stock for one sold copy and write the row back.
    ///
    /// Returns `false` (and changes nothing) when the ISBN is unknown or the
    /// row is out of stock.
    pub fn apply_purchase<S>(&mut self, isbn: &Isbn, store: &mut S) -> bool
    where
        S: KnowledgeStore + ?Sized,
    {
        self.apply_purchase_with(isbn, None, store)
    }

    /// Like [`apply_purchase`](Self::apply_purchase), with an explicit restock flag
    /// instead of the derived `quantity < low_threshold`.
    pub fn apply_purchase_with<S>(&mut self, isbn: &Isbn, needs_restock: Option<bool>, store: &mut S) -> bool
    where
        S: KnowledgeStore + ?Sized,
    {
        let Some(&slot) = self.index.get(isbn) else {
            return false;
        };
        let row = &mut self.rows[slot];
        if row.quantity == 0 {
            return false;
        }
        row.quantity -= 1;
        row.needs_restock = needs_restock.unwrap_or_else(|| row.below_threshold());
        let row = row.clone();
        self.write_back(&row, store);
        true
    }

    /// Add `amount` copies (negative amounts add nothing), clear the pending
    /// request and write the row back.
    pub fn apply_restock<S>(&mut self, isbn: &Isbn, amount: i64, store: &mut S) -> bool
    where
        S: KnowledgeStore + ?Sized,
    {
        self.apply_restock_with(isbn, amount, None, store)
    }

    pub fn apply_restock_with<S>(&mut self, isbn: &Isbn, amount: i64, needs_restock: Option<bool>, store: &mut S) -> bool
    where
        S: KnowledgeStore + ?Sized,
    {
        let Some(&slot) = self.index.get(isbn) else {
            return false;
        };
        let added = u32::try_from(amount.max(0)).unwrap_or(u32::MAX);
        let row = &mut self.rows[slot];
        row.quantity = row.quantity.saturating_add(added);
        row.needs_restock = needs_restock.unwrap_or_else(|| row.below_threshold());
        let row = row.clone();
        self.pending.remove(isbn);
        self.write_back(&row, store);
        true
    }

    /// Pull inferred restock flags back into the rows after a reasoner run.
    ///
    /// Returns how many rows changed.
    pub fn reconcile<S>(&mut self, store: &S) -> usize
    where
        S: KnowledgeStore + ?Sized,
    {
        let mut changed = 0;
        for row in &mut self.rows {
            let Some(handles) = self.handles.get(&row.isbn) else {
                continue;
            };
            if let Some(flag) = store.attribute(&handles.inventory, vocab::NEEDS_RESTOCK).and_then(|v| v.as_bool()) {
                if flag != row.needs_restock {
                    row.needs_restock = flag;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Entity handle of the book behind `isbn`, resolving it lazily.
    pub fn book_entity<S>(&mut self, isbn: &Isbn, store: &mut S) -> EntityRef
    where
        S: KnowledgeStore + ?Sized,
    {
        self.handles_for(isbn, store).book
    }

    pub fn inventory_entity<S>(&mut self, isbn: &Isbn, store: &mut S) -> EntityRef
    where
        S: KnowledgeStore + ?Sized,
    {
        self.handles_for(isbn, store).inventory
    }

    fn handles_for<S>(&mut self, isbn: &Isbn, store: &mut S) -> StoreHandles
    where
        S: KnowledgeStore + ?Sized,
    {
        if let Some(handles) = self.handles.get(isbn) {
            return handles.clone();
        }
        let book = store.resolve_or_create(EntityKind::Book, isbn.as_str());
        let inventory = ensure_inventory_for(store, &book);
        let handles = StoreHandles { book, inventory };
        self.handles.insert(isbn.clone(), handles.clone());
        handles
    }

    fn write_back<S>(&mut self, row: &InventoryRow, store: &mut S)
    where
        S: KnowledgeStore + ?Sized,
    {
        let inventory = self.handles_for(&row.isbn, store).inventory;
        store.assert_attribute(&inventory, vocab::AVAILABLE_QUANTITY, FactValue::Int(i64::from(row.quantity)));
        store.assert_attribute(&inventory, vocab::LOW_THRESHOLD, FactValue::Int(i64::from(row.low_threshold)));
        store.assert_attribute(&inventory, vocab::NEEDS_RESTOCK, FactValue::Bool(row.needs_restock));
    }
}

fn text_attr<S>(store: &S, entity: &EntityRef, attribute: &str) -> Option<String>
where
    S: KnowledgeStore + ?Sized,
{
    store
        .attribute(entity, attribute)
        .and_then(|v| v.as_text().map(str::to_string))
        .filter(|s| !s.trim().is_empty())
}

fn count_attr<S>(store: &S, entity: &EntityRef, attribute: &str) -> Option<u32>
where
    S: KnowledgeStore + ?Sized,
{
    store
        .attribute(entity, attribute)
        .and_then(|v| v.as_int())
        .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
}
