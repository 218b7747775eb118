//! Store trait definition.

use std::collections::HashMap;

/// A flat key-value store.
///
/// Stores know nothing about transactions. They hold the committed state
/// and answer point reads and value lookups against it.
///
/// # Invariants
///
/// - `set(key, None)` behaves exactly like `delete(key)`
/// - `count(value)` equals `find_by_value(value).len()`
/// - Deleting or clearing missing keys is a no-op
/// - Stores must be `Send + Sync` so an engine can be moved across threads
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - Ephemeral in-process map
pub trait KeyValueStore: Send + Sync {
    /// Returns the number of keys currently stored.
    fn size(&self) -> usize;

    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// An absent value removes the key.
    fn set(&mut self, key: &str, value: Option<&str>);

    /// Removes `key` if present.
    fn delete(&mut self, key: &str);

    /// Returns how many keys currently hold `value`.
    fn count(&self, value: &str) -> usize;

    /// Returns every entry whose value equals `value`.
    fn find_by_value(&self, value: &str) -> HashMap<String, String>;

    /// Removes every entry.
    fn clear(&mut self);
}
