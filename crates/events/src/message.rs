use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};

use bookstore_core::{CustomerId, Isbn, Money};

/// Structured key/value payload carried by a message.
pub type Payload = Map<String, JsonValue>;

/// Well-known topic names.
pub mod topics {
    /// Customer purchase decisions, drained by the purchase processor.
    pub const PURCHASES: &str = "purchases";
    /// Restock requests, drained by employee actors.
    pub const RESTOCK: &str = "restock";
}

/// A single queued notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub topic: String,
    pub payload: Payload,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: Payload) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}

/// Turn a JSON value into a payload; non-objects become an empty payload.
pub fn payload_from(value: JsonValue) -> Payload {
    match value {
        JsonValue::Object(map) => map,
        _ => Payload::new(),
    }
}

fn non_empty_str<'a>(payload: &'a Payload, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(JsonValue::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// A customer's decision to buy one copy of a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequested {
    pub customer_id: CustomerId,
    pub book_id: Isbn,
    pub price: Money,
}

impl PurchaseRequested {
    pub fn into_payload(self) -> Payload {
        payload_from(json!({
            "customer_id": self.customer_id.as_str(),
            "book_id": self.book_id.as_str(),
            "price": self.price.as_major(),
        }))
    }

    /// Read a purchase back from a payload.
    ///
    /// Returns `None` when `book_id` or `customer_id` is missing or blank. A
    /// missing or malformed `price` reads as zero.
    pub fn from_payload(payload: &Payload) -> Option<Self> {
        let book_id = Isbn::new(non_empty_str(payload, "book_id")?).ok()?;
        let customer_id = CustomerId::new(non_empty_str(payload, "customer_id")?).ok()?;
        let price = payload
            .get("price")
            .and_then(JsonValue::as_f64)
            .and_then(|p| Money::from_major(p).ok())
            .unwrap_or(Money::ZERO);
        Some(Self {
            customer_id,
            book_id,
            price,
        })
    }
}

/// A request for an employee to replenish a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestockRequested {
    pub book_id: Isbn,
    /// Copies to add; `None` means "use the configured restock amount".
    pub amount: Option<i64>,
}

impl RestockRequested {
    pub fn into_payload(self) -> Payload {
        let mut payload = payload_from(json!({ "book_id": self.book_id.as_str() }));
        if let Some(amount) = self.amount {
            payload.insert("amount".to_string(), json!(amount));
        }
        payload
    }

    /// Read a restock request back from a payload; `None` without a `book_id`.
    pub fn from_payload(payload: &Payload) -> Option<Self> {
        let book_id = Isbn::new(non_empty_str(payload, "book_id")?).ok()?;
        let amount = payload.get("amount").and_then(JsonValue::as_i64);
        Some(Self { book_id, amount })
    }
}
