use serde::{Deserialize, Serialize};
use tracing::debug;

use bookstore_core::{CustomerId, Isbn, Money, OrderId};
use bookstore_events::{MessageBus, PurchaseRequested, topics};
use bookstore_inventory::InventoryLedger;
use bookstore_inventory::row::UNKNOWN_GENRE;
use bookstore_knowledge::{EntityKind, KnowledgeStore, vocab};

use crate::sequence::OrderSequence;

/// One applied purchase. Append-only; `order_id` is never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub isbn: Isbn,
    pub unit_price: Money,
    pub genre: String,
    pub tick: u64,
}

#[derive(Debug, Default)]
pub struct PurchaseProcessor {
    sequence: OrderSequence,
    log: Vec<PurchaseRecord>,
}

impl PurchaseProcessor {
    pub fn new(sequence: OrderSequence) -> Self {
        Self {
            sequence,
            log: Vec::new(),
        }
    }

    pub fn log(&self) -> &[PurchaseRecord] {
        &self.log
    }

    pub fn next_order_id(&self) -> OrderId {
        self.sequence.peek()
    }

    /// Drain the purchases topic and apply every valid request.
    ///
    /// Requests with missing fields, unknown books or exhausted stock are
    /// discarded. Returns the number of purchases applied.
    pub fn process<B, S>(&mut self, tick: u64, bus: &mut B, ledger: &mut InventoryLedger, store: &mut S) -> usize
    where
        B: MessageBus + ?Sized,
        S: KnowledgeStore + ?Sized,
    {
        let mut applied = 0;
        for message in bus.drain(topics::PURCHASES) {
            let Some(request) = PurchaseRequested::from_payload(&message.payload) else {
                debug!(tick, "discarding malformed purchase request");
                continue;
            };
            if !ledger.apply_purchase(&request.book_id, store) {
                debug!(tick, isbn = %request.book_id, customer = %request.customer_id, "purchase not fulfillable");
                continue;
            }
            self.record(tick, request, ledger, store);
            applied += 1;
        }
        applied
    }

    fn record<S>(&mut self, tick: u64, request: PurchaseRequested, ledger: &mut InventoryLedger, store: &mut S)
    where
        S: KnowledgeStore + ?Sized,
    {
        let customer = store.resolve_or_create(EntityKind::Customer, &request.customer_id.entity_name());
        let book = ledger.book_entity(&request.book_id, store);
        store.assert_relation(&customer, vocab::PURCHASES, &book);

        let order_id = self.sequence.allocate();
        let order = store.resolve_or_create(EntityKind::Order, &order_id.to_string());
        store.assert_relation(&order, vocab::ORDERED_BY, &customer);
        store.assert_relation(&order, vocab::ORDERED_BOOK, &book);

        let genre = ledger
            .get(&request.book_id)
            .map(|row| row.genre.clone())
            .unwrap_or_else(|| UNKNOWN_GENRE.to_string());

        self.log.push(PurchaseRecord {
            order_id,
            customer_id: request.customer_id,
            isbn: request.book_id,
            unit_price: request.price,
            genre,
            tick,
        });
    }
}
