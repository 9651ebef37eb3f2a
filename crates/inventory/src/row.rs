use serde::{Deserialize, Serialize};

use bookstore_core::{Isbn, Money};

/// Genre recorded for books whose seed data has none.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Current stock state of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub isbn: Isbn,
    pub title: String,
    pub genre: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub low_threshold: u32,
    /// Last known restock need: computed on mutation, or taken from inference.
    pub needs_restock: bool,
}

impl InventoryRow {
    pub fn new(isbn: Isbn, title: impl Into<String>, unit_price: Money, quantity: u32, low_threshold: u32) -> Self {
        let mut row = Self {
            isbn,
            title: title.into(),
            genre: UNKNOWN_GENRE.to_string(),
            unit_price,
            quantity,
            low_threshold,
            needs_restock: false,
        };
        row.needs_restock = row.below_threshold();
        row
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    /// The procedural restock check: `quantity < low_threshold`.
    pub fn below_threshold(&self) -> bool {
        self.quantity < self.low_threshold
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_row_derives_restock_flag() {
        let isbn = Isbn::new("A").unwrap();
        assert!(InventoryRow::new(isbn.clone(), "A", Money::ZERO, 4, 5).needs_restock);
        assert!(!InventoryRow::new(isbn.clone(), "A", Money::ZERO, 5, 5).needs_restock);
        assert!(!InventoryRow::new(isbn, "A", Money::ZERO, 0, 0).needs_restock);
    }
}
