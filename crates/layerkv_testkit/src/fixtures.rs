//! Engine fixtures.
//!
//! Convenience constructors for engines with known contents.

use layerkv_core::{InMemoryStore, StorageEngine};
use std::collections::{BTreeMap, HashMap};

/// Creates an engine whose store holds `key_1..=key_n` mapped to
/// `value_1..=value_n`.
pub fn seeded_engine(size: usize) -> StorageEngine {
    StorageEngine::new(Box::new(InMemoryStore::with_data(seed_entries(size))))
}

/// Creates an engine whose store holds exactly `entries`.
pub fn engine_with(entries: &[(&str, &str)]) -> StorageEngine {
    let data = entries
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    StorageEngine::new(Box::new(InMemoryStore::with_data(data)))
}

/// Returns the entries [`seeded_engine`] starts with.
pub fn seed_entries(size: usize) -> HashMap<String, String> {
    (1..=size)
        .map(|i| (format!("key_{i}"), format!("value_{i}")))
        .collect()
}

/// Reads every key in `keys` through the engine.
///
/// Two calls return equal maps exactly when `get` answers the same for
/// every key.
pub fn visible_state<'a, I>(engine: &StorageEngine, keys: I) -> BTreeMap<String, Option<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .map(|key| (key.to_owned(), engine.get(key)))
        .collect()
}
