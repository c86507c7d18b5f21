//! Flat string-keyed settings storage.
//!
//! The token cache persists its entries through a platform settings store
//! (shared preferences, user defaults). That store is an external
//! collaborator, so it is modeled as a narrow trait with an in-memory
//! implementation for tests and embedding.

use dashmap::DashMap;
use std::sync::Arc;

/// A flat string-keyed settings store.
///
/// Implementations must tolerate concurrent readers and writers. The token
/// cache performs unsynchronized read-modify-write cycles and relies on
/// distinct keys for independent tokens rather than on transactions.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str);

    /// Removes the entry for `key`, if present.
    fn remove(&self, key: &str);
}

/// Thread-safe in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self { entries: Arc::new(DashMap::new()) }
    }

    /// Get number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    fn put(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}
