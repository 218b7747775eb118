//! Engine statistics.
//!
//! Counters for monitoring how an engine is used.
//!
//! # Usage
//!
//! ```rust
//! use layerkv_core::StorageEngine;
//!
//! let mut engine = StorageEngine::in_memory();
//! engine.put("foo", "123");
//! engine.begin();
//! engine.commit().unwrap();
//!
//! let stats = engine.stats().snapshot();
//! assert_eq!(stats.writes, 1);
//! assert_eq!(stats.transactions_committed, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Engine statistics.
///
/// All counters are atomic so they can be bumped through `&self` from the
/// read paths. Values only ever increase.
#[derive(Debug, Default)]
pub struct EngineStats {
    // Operation counters
    /// Total number of point reads.
    reads: AtomicU64,
    /// Total number of put operations.
    writes: AtomicU64,
    /// Total number of remove operations.
    deletes: AtomicU64,
    /// Total number of value counts.
    counts: AtomicU64,
    /// Total number of clears.
    clears: AtomicU64,

    // Transaction counters
    /// Total number of transactions started.
    transactions_started: AtomicU64,
    /// Total number of transactions committed.
    transactions_committed: AtomicU64,
    /// Total number of transactions rolled back.
    transactions_rolled_back: AtomicU64,
    /// Commits or rollbacks attempted with no transaction open.
    failed_closes: AtomicU64,

    // Flush counters
    /// Outermost commits written through to the store.
    flushes: AtomicU64,
    /// Operations written to the store by those flushes.
    operations_flushed: AtomicU64,
}

impl EngineStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_count(&self) {
        self.counts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_start(&self) {
        self.transactions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_commit(&self) {
        self.transactions_committed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_rollback(&self) {
        self.transactions_rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed_close(&self) {
        self.failed_closes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_flush(&self, operations: u64) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.operations_flushed
            .fetch_add(operations, Ordering::Relaxed);
    }

    /// Returns the total number of point reads.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the total number of put operations.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns the total number of remove operations.
    pub fn deletes(&self) -> u64 {
        self.deletes.load(Ordering::Relaxed)
    }

    /// Returns the total number of value counts.
    pub fn counts(&self) -> u64 {
        self.counts.load(Ordering::Relaxed)
    }

    /// Returns the total number of clears.
    pub fn clears(&self) -> u64 {
        self.clears.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions started.
    pub fn transactions_started(&self) -> u64 {
        self.transactions_started.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions committed.
    pub fn transactions_committed(&self) -> u64 {
        self.transactions_committed.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions rolled back.
    pub fn transactions_rolled_back(&self) -> u64 {
        self.transactions_rolled_back.load(Ordering::Relaxed)
    }

    /// Returns how many commits or rollbacks found no open transaction.
    pub fn failed_closes(&self) -> u64 {
        self.failed_closes.load(Ordering::Relaxed)
    }

    /// Returns how many outermost commits were flushed to the store.
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    /// Returns how many operations were written by flushes.
    pub fn operations_flushed(&self) -> u64 {
        self.operations_flushed.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reads: self.reads(),
            writes: self.writes(),
            deletes: self.deletes(),
            counts: self.counts(),
            clears: self.clears(),
            transactions_started: self.transactions_started(),
            transactions_committed: self.transactions_committed(),
            transactions_rolled_back: self.transactions_rolled_back(),
            failed_closes: self.failed_closes(),
            flushes: self.flushes(),
            operations_flushed: self.operations_flushed(),
        }
    }
}

/// A point-in-time snapshot of engine statistics.
///
/// Unlike `EngineStats`, this is a plain struct that can be compared or
/// handed to a reporter without atomics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Total number of point reads.
    pub reads: u64,
    /// Total number of put operations.
    pub writes: u64,
    /// Total number of remove operations.
    pub deletes: u64,
    /// Total number of value counts.
    pub counts: u64,
    /// Total number of clears.
    pub clears: u64,
    /// Total number of transactions started.
    pub transactions_started: u64,
    /// Total number of transactions committed.
    pub transactions_committed: u64,
    /// Total number of transactions rolled back.
    pub transactions_rolled_back: u64,
    /// Commits or rollbacks attempted with no transaction open.
    pub failed_closes: u64,
    /// Outermost commits written through to the store.
    pub flushes: u64,
    /// Operations written to the store by flushes.
    pub operations_flushed: u64,
}
