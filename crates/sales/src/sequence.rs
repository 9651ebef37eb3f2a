use bookstore_core::OrderId;
use bookstore_knowledge::{EntityKind, KnowledgeStore};

/// Strictly increasing source of order ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderSequence {
    next: u64,
}

impl OrderSequence {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Continue numbering after whatever orders the store already holds.
    ///
    /// Uses the larger of the order entity count and the highest `order_<n>`
    /// suffix plus one, so a gap in persisted orders cannot cause reuse.
    pub fn rederive<S>(store: &S) -> Self
    where
        S: KnowledgeStore + ?Sized,
    {
        let orders = store.instances(EntityKind::Order);
        let after_highest = orders
            .iter()
            .filter_map(|order| OrderId::parse_entity_name(&order.name))
            .map(|id| id.sequence() + 1)
            .max()
            .unwrap_or(0);
        Self::starting_at(after_highest.max(orders.len() as u64))
    }

    pub fn peek(&self) -> OrderId {
        OrderId::new(self.next)
    }

    pub fn allocate(&mut self) -> OrderId {
        let id = OrderId::new(self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_knowledge::InMemoryKnowledgeStore;

    #[test]
    fn allocation_is_strictly_increasing() {
        let mut seq = OrderSequence::default();
        let ids: Vec<u64> = (0..4).map(|_| seq.allocate().sequence()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(seq.peek().sequence(), 4);
    }

    #[test]
    fn rederive_from_empty_store_starts_at_zero() {
        let store = InMemoryKnowledgeStore::new("http://example.org/bookstore");
        assert_eq!(OrderSequence::rederive(&store).peek().sequence(), 0);
    }

    #[test]
    fn rederive_skips_past_gaps() {
        let mut store = InMemoryKnowledgeStore::new("http://example.org/bookstore");
        store.resolve_or_create(EntityKind::Order, "order_0");
        store.resolve_or_create(EntityKind::Order, "order_7");
        assert_eq!(OrderSequence::rederive(&store).peek().sequence(), 8);
    }

    #[test]
    fn rederive_counts_foreign_names() {
        let mut store = InMemoryKnowledgeStore::new("http://example.org/bookstore");
        store.resolve_or_create(EntityKind::Order, "legacy-a");
        store.resolve_or_create(EntityKind::Order, "legacy-b");
        store.resolve_or_create(EntityKind::Order, "order_0");
        assert_eq!(OrderSequence::rederive(&store).peek().sequence(), 3);
    }
}
