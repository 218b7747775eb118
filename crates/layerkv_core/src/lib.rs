//! # layerkv Core
//!
//! Nested-transaction engine for layerkv.
//!
//! This crate provides:
//! - Pending write/delete operations recorded per nesting depth
//! - A stack of transaction frames with begin, commit and rollback
//! - Point reads resolved innermost-first down to the backing store
//! - Value counts that reflect every pending, uncommitted operation
//!
//! ## Example
//!
//! ```rust
//! use layerkv_core::StorageEngine;
//!
//! let mut engine = StorageEngine::in_memory();
//! engine.put("foo", "123");
//!
//! engine.begin();
//! engine.put("foo", "456");
//! assert_eq!(engine.count("456"), 1);
//!
//! engine.rollback().unwrap();
//! assert_eq!(engine.get("foo").as_deref(), Some("123"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
mod stats;
pub mod transaction;
mod types;

pub use engine::StorageEngine;
pub use layerkv_storage::{InMemoryStore, KeyValueStore};
pub use error::{CoreError, CoreResult};
pub use stats::{EngineStats, StatsSnapshot};
pub use transaction::{
    merge_frame, Commit, Operation, OperationMap, TransactionFrame, TransactionStack,
};
pub use types::{Key, TransactionId, Value};

/// Crate version, as recorded in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
