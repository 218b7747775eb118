//! The public storage engine.

use crate::error::CoreResult;
use crate::stats::EngineStats;
use crate::transaction::{merge_frame, Commit, Operation, OperationMap, TransactionStack};
use crate::types::{TransactionId, Value};
use layerkv_storage::{InMemoryStore, KeyValueStore};
use std::fmt;
use tracing::{debug, trace};

/// A transactional key-value store with arbitrarily nested transactions.
///
/// With no transaction open, writes go straight to the backing store.
/// Inside a transaction they are recorded in the innermost frame only and
/// reach the store when the outermost transaction commits. Reads and
/// counts always reflect every pending operation.
///
/// # Concurrency
///
/// The engine has no internal locking. Mutating methods take `&mut self`,
/// so sharing one engine between threads needs an external mutex.
///
/// # Example
///
/// ```rust
/// use layerkv_core::{CoreError, StorageEngine};
///
/// let mut engine = StorageEngine::in_memory();
/// engine.put("bar", "123");
///
/// engine.begin();
/// engine.put("foo", "456");
/// engine.remove("bar");
/// engine.commit().unwrap();
///
/// assert_eq!(engine.get("bar"), None);
/// assert_eq!(engine.rollback(), Err(CoreError::NoOpenTransaction));
/// assert_eq!(engine.get("foo").as_deref(), Some("456"));
/// ```
pub struct StorageEngine {
    /// Committed state.
    store: Box<dyn KeyValueStore>,
    /// Open transactions.
    stack: TransactionStack,
    /// Usage counters.
    stats: EngineStats,
}

impl StorageEngine {
    /// Creates an engine over the given store.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            stack: TransactionStack::new(),
            stats: EngineStats::new(),
        }
    }

    /// Creates an engine over an empty [`InMemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(InMemoryStore::new()))
    }

    /// Returns the effective value of `key`.
    ///
    /// The innermost frame that touched the key decides; a pending delete
    /// at any depth hides everything below it. Keys untouched by every
    /// open frame are read from the store.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.stats.record_read();

        let value = match self.stack.lookup(key) {
            Some(operation) => operation.value().map(str::to_owned),
            None => self.store.get(key),
        };
        trace!(key, found = value.is_some(), "get");
        value
    }

    /// Sets `key` to `value`.
    pub fn put(&mut self, key: &str, value: &str) {
        self.stats.record_write();
        self.write(key, Operation::set(value));
    }

    /// Removes `key`. Removing a missing key is a no-op.
    pub fn remove(&mut self, key: &str) {
        self.stats.record_delete();
        self.write(key, Operation::Delete);
    }

    /// Returns how many keys currently have the effective value `value`.
    ///
    /// Store entries holding `value` form the base; the composite of all
    /// open frames is laid on top, which can add keys that only exist in
    /// a transaction and hide or change keys the store holds. Neither the
    /// store nor any frame is modified.
    #[must_use]
    pub fn count(&self, value: &str) -> usize {
        self.stats.record_count();

        let base: OperationMap = self
            .store
            .find_by_value(value)
            .into_iter()
            .map(|(key, stored)| (key, Operation::Set(stored)))
            .collect();

        let count = merge_frame(base, self.stack.composite())
            .values()
            .filter(|operation| operation.value() == Some(value))
            .count();
        trace!(value, count, "count");
        count
    }

    /// Empties the store and drops every open transaction unmerged.
    pub fn clear(&mut self) {
        self.stats.record_clear();

        let discarded = self.stack.clear();
        self.store.clear();
        debug!(discarded, "storage cleared");
    }

    /// Opens a transaction nested in the current one, if any.
    pub fn begin(&mut self) -> TransactionId {
        self.stats.record_transaction_start();

        let txid = self.stack.begin();
        debug!(txn = %txid, depth = self.stack.depth(), "transaction started");
        txid
    }

    /// Commits the innermost transaction.
    ///
    /// A nested transaction is merged into its parent and the store is not
    /// touched. Committing the outermost transaction writes its operations
    /// through to the store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::NoOpenTransaction`] if no transaction is
    /// open; nothing changes.
    pub fn commit(&mut self) -> CoreResult<()> {
        let commit = self.stack.commit().inspect_err(|_| {
            self.stats.record_failed_close();
        })?;
        self.stats.record_transaction_commit();

        match commit {
            Commit::Merged { committed, parent } => {
                debug!(
                    txn = %committed,
                    parent = %parent,
                    depth = self.stack.depth(),
                    "transaction merged into parent"
                );
            }
            Commit::Flush {
                committed,
                operations,
            } => {
                let flushed = operations.len();
                self.flush(operations);
                debug!(txn = %committed, flushed, "transaction flushed to store");
            }
        }
        Ok(())
    }

    /// Rolls back the innermost transaction, discarding its operations.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::NoOpenTransaction`] if no transaction is
    /// open; nothing changes.
    pub fn rollback(&mut self) -> CoreResult<()> {
        let frame = self.stack.rollback().inspect_err(|_| {
            self.stats.record_failed_close();
        })?;
        self.stats.record_transaction_rollback();

        debug!(
            txn = %frame.id(),
            discarded = frame.len(),
            depth = self.stack.depth(),
            "transaction rolled back"
        );
        Ok(())
    }

    /// Returns the transaction nesting depth (0 when none is open).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Checks if a transaction is open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.stack.is_open()
    }

    /// Returns the backing store, holding committed state only.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        &*self.store
    }

    /// Returns the engine statistics.
    #[must_use]
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Routes a write to the innermost frame, or to the store when no
    /// transaction is open.
    fn write(&mut self, key: &str, operation: Operation) {
        match self.stack.innermost_mut() {
            Some(frame) => {
                trace!(key, txn = %frame.id(), delete = operation.is_delete(), "write recorded");
                frame.record(key, operation);
            }
            None => {
                trace!(key, delete = operation.is_delete(), "write applied to store");
                self.store.set(key, operation.value());
            }
        }
    }

    /// Writes the operations of a committed outermost frame to the store.
    fn flush(&mut self, operations: OperationMap) {
        self.stats.record_flush(operations.len() as u64);

        for (key, operation) in operations {
            match operation {
                Operation::Set(value) => self.store.set(&key, Some(&value)),
                Operation::Delete => self.store.delete(&key),
            }
        }
    }
}

impl Default for StorageEngine {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for StorageEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageEngine")
            .field("store_size", &self.store.size())
            .field("stack", &self.stack)
            .finish()
    }
}
