use std::collections::BTreeSet;

use bookstore_core::Isbn;

/// ISBNs with an outstanding, unfulfilled restock request.
///
/// At most one request per ISBN may be in flight: an ISBN enters when a
/// request is published and leaves when an employee fulfils it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingRestockSet {
    isbns: BTreeSet<Isbn>,
}

impl PendingRestockSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if a request for `isbn` is already pending.
    pub fn insert(&mut self, isbn: Isbn) -> bool {
        self.isbns.insert(isbn)
    }

    pub fn remove(&mut self, isbn: &Isbn) -> bool {
        self.isbns.remove(isbn)
    }

    pub fn contains(&self, isbn: &Isbn) -> bool {
        self.isbns.contains(isbn)
    }

    pub fn len(&self) -> usize {
        self.isbns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.isbns.is_empty()
    }
}
