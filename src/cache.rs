//! In-memory todo cache.
//!
//! The cache is the single source of truth for rendering and for reminder
//! evaluation. It holds items in the order the remote store returned them and
//! offers no per-item removal or mutation: every write-path operation except
//! create goes through a full refresh followed by an atomic [`replace`],
//! which is what keeps evaluation from ever observing a partial list.
//!
//! [`replace`]: TodoCache::replace

use crate::types::TodoItem;

/// Ordered, process-lifetime collection of todo items.
#[derive(Debug, Default)]
pub struct TodoCache {
    items: Vec<TodoItem>,
}

impl TodoCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically swaps the entire contents for `items`.
    ///
    /// Idempotent with respect to prior contents: after a replace the cache
    /// holds exactly the replacement sequence, in its order.
    pub fn replace(&mut self, items: Vec<TodoItem>) {
        self.items = items;
    }

    /// Appends a single item, preserving insertion order.
    ///
    /// Used on the create path only, where the remote store has just returned
    /// the canonical item and a full refetch would be redundant.
    pub fn append(&mut self, item: TodoItem) {
        self.items.push(item);
    }

    /// Returns the current item sequence in insertion order.
    #[must_use]
    pub fn all(&self) -> &[TodoItem] {
        &self.items
    }

    /// Returns a clone of the current item sequence.
    ///
    /// Snapshots are what the reminder evaluator works on, so a refresh
    /// landing mid-evaluation can never be observed.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TodoItem> {
        self.items.clone()
    }

    /// Returns the number of cached items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cache holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empties the cache. Called on logout, when the session is torn down.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
