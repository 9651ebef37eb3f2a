//! In-memory message bus.

use std::collections::{HashMap, VecDeque};

use crate::bus::MessageBus;
use crate::message::{Message, Payload};

/// In-memory topic queues.
///
/// - No IO / no async
/// - One `VecDeque` per topic, created on first publish
#[derive(Debug, Default)]
pub struct InMemoryMessageBus {
    topics: HashMap<String, VecDeque<Message>>,
}

impl InMemoryMessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total messages queued across all topics.
    pub fn len(&self) -> usize {
        self.topics.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look at queued messages on `topic` without consuming them.
    pub fn peek_all(&self, topic: &str) -> impl Iterator<Item = &Message> {
        self.topics.get(topic).into_iter().flat_map(|q| q.iter())
    }
}

impl MessageBus for InMemoryMessageBus {
    fn publish(&mut self, topic: &str, payload: Payload) {
        let queue = self.topics.entry(topic.to_string()).or_default();
        queue.push_back(Message::new(topic, payload));
        tracing::trace!(topic, depth = queue.len(), "message published");
    }

    fn poll(&mut self, topic: &str) -> Option<Message> {
        self.topics.get_mut(topic)?.pop_front()
    }

    fn pending(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, VecDeque::len)
    }

    fn clear(&mut self) {
        self.topics.clear();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::message::payload_from;

    fn payload(n: i64) -> Payload {
        payload_from(json!({ "n": n }))
    }

    #[test]
    fn poll_on_unknown_topic_is_empty() {
        let mut bus = InMemoryMessageBus::new();
        assert!(bus.poll("purchases").is_none());
        assert_eq!(bus.pending("purchases"), 0);
    }

    #[test]
    fn messages_are_fifo_per_topic() {
        let mut bus = InMemoryMessageBus::new();
        bus.publish("a", payload(1));
        bus.publish("b", payload(10));
        bus.publish("a", payload(2));

        assert_eq!(bus.poll("a").unwrap().payload["n"], 1);
        assert_eq!(bus.poll("a").unwrap().payload["n"], 2);
        assert!(bus.poll("a").is_none());

        let b = bus.poll("b").unwrap();
        assert_eq!(b.topic, "b");
        assert_eq!(b.payload["n"], 10);
    }

    #[test]
    fn drain_empties_topic_in_order() {
        let mut bus = InMemoryMessageBus::new();
        for n in 0..5 {
            bus.publish("restock", payload(n));
        }
        bus.publish("purchases", payload(99));

        let drained: Vec<i64> = bus
            .drain("restock")
            .into_iter()
            .map(|m| m.payload["n"].as_i64().unwrap())
            .collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert_eq!(bus.pending("restock"), 0);
        assert_eq!(bus.pending("purchases"), 1);
    }

    #[test]
    fn clear_drops_every_topic() {
        let mut bus = InMemoryMessageBus::new();
        bus.publish("a", payload(1));
        bus.publish("b", payload(2));
        assert_eq!(bus.len(), 2);

        bus.clear();
        assert!(bus.is_empty());
        assert!(bus.poll("a").is_none());
    }

    #[test]
    fn peek_does_not_consume() {
        let mut bus = InMemoryMessageBus::new();
        bus.publish("a", payload(1));
        assert_eq!(bus.peek_all("a").count(), 1);
        assert_eq!(bus.pending("a"), 1);
    }
}
