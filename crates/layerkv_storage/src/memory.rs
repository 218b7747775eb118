//! In-memory key-value store.

use crate::store::KeyValueStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory key-value store.
///
/// This store keeps every entry in a `HashMap` and is suitable for:
/// - The interactive CLI
/// - Unit and integration tests
/// - Any embedding that does not need the data to outlive the process
///
/// # Thread Safety
///
/// The map sits behind a read-write lock, so the store is `Send + Sync`
/// and can be inspected through a shared reference.
///
/// # Example
///
/// ```rust
/// use layerkv_storage::{InMemoryStore, KeyValueStore};
///
/// let mut store = InMemoryStore::new();
/// store.set("foo", Some("123"));
/// store.set("bar", Some("123"));
/// assert_eq!(store.size(), 2);
/// assert_eq!(store.find_by_value("123").len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with pre-existing entries.
    ///
    /// Useful for seeding tests.
    #[must_use]
    pub fn with_data(data: HashMap<String, String>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Returns a copy of every entry in the store.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn entries(&self) -> HashMap<String, String> {
        self.data.read().clone()
    }
}

impl KeyValueStore for InMemoryStore {
    fn size(&self) -> usize {
        self.data.read().len()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.data.write().insert(key.to_owned(), value.to_owned());
            }
            None => self.delete(key),
        }
    }

    fn delete(&mut self, key: &str) {
        self.data.write().remove(key);
    }

    fn count(&self, value: &str) -> usize {
        self.data.read().values().filter(|v| *v == value).count()
    }

    fn find_by_value(&self, value: &str) -> HashMap<String, String> {
        self.data
            .read()
            .iter()
            .filter(|(_, v)| *v == value)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn clear(&mut self) {
        self.data.write().clear();
    }
}
