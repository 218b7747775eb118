//! # layerkv Storage
//!
//! The flat backing store used by the layerkv transaction engine.
//!
//! A store is a plain string-keyed, string-valued map with no notion of
//! transactions. The engine in `layerkv_core` only consults it when no
//! pending operation exists for a key, and only writes to it when the
//! outermost transaction commits (or when no transaction is open).
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - A `HashMap` behind a read-write lock
//!
//! ## Example
//!
//! ```rust
//! use layerkv_storage::{InMemoryStore, KeyValueStore};
//!
//! let mut store = InMemoryStore::new();
//! store.set("foo", Some("123"));
//! assert_eq!(store.get("foo").as_deref(), Some("123"));
//! assert_eq!(store.count("123"), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod store;

pub use memory::InMemoryStore;
pub use store::KeyValueStore;
