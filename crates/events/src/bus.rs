//! Message publishing/draining abstraction (mechanics only).
//!
//! The bus decouples the actor that decides something (a customer choosing a
//! book, the restock coordinator spotting low stock) from the component that
//! applies it (the purchase processor, the employee).
//!
//! ## Delivery guarantees
//!
//! - **FIFO per topic**: `poll(topic)` returns messages in publication order.
//! - **No cross-topic ordering**: topics are independent queues.
//! - **Exactly-once consumption**: a polled message is removed; nothing is
//!   dropped except by draining or `clear()`.
//! - **Unbounded**: queue length is bounded only by how much actors publish
//!   within a tick.
//!
//! ## Thread safety
//!
//! None. Every method takes `&mut self` and the bus is owned by the
//! simulation instance, which is driven by one tick at a time.

use crate::message::{Message, Payload};

/// Topic-keyed FIFO message bus.
pub trait MessageBus {
    /// Append a message to `topic`, creating the queue if absent.
    fn publish(&mut self, topic: &str, payload: Payload);

    /// Remove and return the oldest message on `topic`, or `None` when empty.
    fn poll(&mut self, topic: &str) -> Option<Message>;

    /// Number of messages waiting on `topic`.
    fn pending(&self, topic: &str) -> usize;

    /// Drop every queued message on every topic.
    fn clear(&mut self);

    /// Drain `topic` to completion, oldest first.
    ///
    /// Messages published *while* draining are not observed by this call.
    fn drain(&mut self, topic: &str) -> Vec<Message> {
        let mut out = Vec::with_capacity(self.pending(topic));
        for _ in 0..self.pending(topic) {
            match self.poll(topic) {
                Some(message) => out.push(message),
                None => break,
            }
        }
        out
    }
}

impl<B> MessageBus for Box<B>
where
    B: MessageBus + ?Sized,
{
    fn publish(&mut self, topic: &str, payload: Payload) {
        (**self).publish(topic, payload)
    }

    fn poll(&mut self, topic: &str) -> Option<Message> {
        (**self).poll(topic)
    }

    fn pending(&self, topic: &str) -> usize {
        (**self).pending(topic)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}
