//! Run summaries.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookstore_inventory::InventoryLedger;
use bookstore_knowledge::{EntityKind, EntityRef, KnowledgeStore, vocab};
use bookstore_purchasing::RestockRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLine {
    pub isbn: String,
    pub title: String,
    pub genre: String,
    pub price: f64,
    pub quantity: u32,
    pub low_threshold: u32,
    pub needs_restock: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockLine {
    pub step: u64,
    pub isbn: String,
    pub amount: u32,
    pub employee_id: Option<String>,
}

impl From<&RestockRecord> for RestockLine {
    fn from(record: &RestockRecord) -> Self {
        Self {
            step: record.tick,
            isbn: record.isbn.to_string(),
            amount: record.amount,
            employee_id: record.employee_id.as_ref().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: String,
    pub purchased_books: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub steps_run: u64,
    pub reasoner_active: bool,
    pub generated_at: DateTime<Utc>,
    pub inventory: Vec<InventoryLine>,
    /// Customer entity name to sorted ISBNs; customers without purchases are omitted.
    pub purchases: BTreeMap<String, Vec<String>>,
    pub restocks: Vec<RestockLine>,
}

impl Report {
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "=== Inventory Summary ===");
        for line in &self.inventory {
            let _ = writeln!(
                out,
                "{} | {} | price={:.2} | qty={} | threshold={}{}",
                line.isbn,
                line.title,
                line.price,
                line.quantity,
                line.low_threshold,
                if line.needs_restock { " | needs restock" } else { "" },
            );
        }

        let _ = writeln!(out, "\n=== Purchases by Customer ===");
        if self.purchases.is_empty() {
            let _ = writeln!(out, "No purchases recorded.");
        }
        for (customer, books) in &self.purchases {
            let _ = writeln!(out, "{customer}: {}", books.join(", "));
        }

        let _ = writeln!(out, "\n=== Restocks ===");
        if self.restocks.is_empty() {
            let _ = writeln!(out, "No restocks performed.");
        }
        for entry in &self.restocks {
            let _ = writeln!(
                out,
                "step={} | isbn={} | amount={} | employee={}",
                entry.step,
                entry.isbn,
                entry.amount,
                entry.employee_id.as_deref().unwrap_or("-"),
            );
        }

        if !self.reasoner_active {
            let _ = writeln!(out, "\n[warning] reasoner unavailable; low-stock rules did not execute.");
        }
        out
    }
}

impl core::fmt::Display for Report {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.render_text())
    }
}

/// Inventory as the store sees it, falling back to the ledger per field.
pub(crate) fn inventory_lines<S>(ledger: &InventoryLedger, store: &S) -> Vec<InventoryLine>
where
    S: KnowledgeStore + ?Sized,
{
    ledger
        .snapshot()
        .iter()
        .map(|row| {
            let inventory = store
                .find(EntityKind::Book, row.isbn.as_str())
                .and_then(|book| store.related(&book, vocab::HAS_INVENTORY).into_iter().next());
            let read = |attribute: &str| inventory.as_ref().and_then(|inv| store.attribute(inv, attribute));

            let quantity = read(vocab::AVAILABLE_QUANTITY)
                .and_then(|v| v.as_int())
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(row.quantity);
            let low_threshold = read(vocab::LOW_THRESHOLD)
                .and_then(|v| v.as_int())
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(row.low_threshold);
            let needs_restock = read(vocab::NEEDS_RESTOCK)
                .and_then(|v| v.as_bool())
                .unwrap_or(quantity < low_threshold);

            InventoryLine {
                isbn: row.isbn.to_string(),
                title: row.title.clone(),
                genre: row.genre.clone(),
                price: row.unit_price.as_major(),
                quantity,
                low_threshold,
                needs_restock,
            }
        })
        .collect()
}

/// Confirmed purchases when inference has run, raw purchase facts otherwise.
fn purchased_books<S>(store: &S, customer: &EntityRef) -> Vec<String>
where
    S: KnowledgeStore + ?Sized,
{
    let mut books = store.related(customer, vocab::HAS_PURCHASED);
    if books.is_empty() {
        books = store.related(customer, vocab::PURCHASES);
    }
    books
        .into_iter()
        .map(|book| book.name)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every customer entity, with or without purchases, in store order.
pub(crate) fn customer_summaries<S>(store: &S) -> Vec<CustomerSummary>
where
    S: KnowledgeStore + ?Sized,
{
    store
        .instances(EntityKind::Customer)
        .into_iter()
        .map(|customer| CustomerSummary {
            purchased_books: purchased_books(store, &customer),
            customer_id: customer.name,
        })
        .collect()
}

pub(crate) fn purchases_by_customer<S>(store: &S) -> BTreeMap<String, Vec<String>>
where
    S: KnowledgeStore + ?Sized,
{
    customer_summaries(store)
        .into_iter()
        .filter(|summary| !summary.purchased_books.is_empty())
        .map(|summary| (summary.customer_id, summary.purchased_books))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        Report {
            steps_run: 3,
            reasoner_active: false,
            generated_at: Utc::now(),
            inventory: vec![InventoryLine {
                isbn: "A".into(),
                title: "Alpha".into(),
                genre: "Unknown".into(),
                price: 10.0,
                quantity: 0,
                low_threshold: 5,
                needs_restock: true,
            }],
            purchases: BTreeMap::from([("customer_0".to_string(), vec!["A".to_string()])]),
            restocks: Vec::new(),
        }
    }

    #[test]
    fn text_rendering_lists_every_section() {
        let text = report().render_text();
        assert!(text.contains("A | Alpha | price=10.00 | qty=0 | threshold=5 | needs restock"));
        assert!(text.contains("customer_0: A"));
        assert!(text.contains("No restocks performed."));
        assert!(text.contains("[warning] reasoner unavailable"));
    }

    #[test]
    fn report_serialises_with_purchases_map() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["purchases"]["customer_0"][0], "A");
        assert_eq!(json["reasoner_active"], false);
    }
}
