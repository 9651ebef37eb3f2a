use serde::{Deserialize, Serialize};

use bookstore_simulation::{InventoryRow, PurchaseRecord, RestockLine, RestockRecord};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RunStepRequest {
    pub steps: i64,
    pub reasoner_sync_interval: Option<i64>,
    pub random_seed: Option<u64>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct RunStepResponse {
    pub steps_advanced: i64,
    pub step_count: u64,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub step_count: u64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct InventoryItem {
    pub isbn: String,
    pub title: String,
    pub genre: String,
    pub price: f64,
    pub quantity: u32,
    pub low_threshold: u32,
    pub needs_restock: bool,
}

#[derive(Debug, Serialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer: String,
    pub book: String,
    pub genre: String,
    pub step: u64,
    pub price: f64,
}

// -------------------------
// Mapping
// -------------------------

pub fn inventory_item(row: &InventoryRow) -> InventoryItem {
    InventoryItem {
        isbn: row.isbn.to_string(),
        title: row.title.clone(),
        genre: row.genre.clone(),
        price: row.unit_price.as_major(),
        quantity: row.quantity,
        low_threshold: row.low_threshold,
        needs_restock: row.needs_restock,
    }
}

pub fn order_record(record: &PurchaseRecord) -> OrderRecord {
    OrderRecord {
        order_id: record.order_id.to_string(),
        customer: record.customer_id.to_string(),
        book: record.isbn.to_string(),
        genre: record.genre.clone(),
        step: record.tick,
        price: record.unit_price.as_major(),
    }
}

pub fn restock_line(record: &RestockRecord) -> RestockLine {
    RestockLine::from(record)
}
