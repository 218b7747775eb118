//! Stats report printed on exit.

use crate::error::CliResult;
use layerkv_core::StatsSnapshot;
use serde::Serialize;

/// Engine usage over one CLI session.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    /// Engine version.
    pub version: &'static str,
    /// Point reads (`GET`).
    pub reads: u64,
    /// Writes (`SET`).
    pub writes: u64,
    /// Deletes (`DELETE`).
    pub deletes: u64,
    /// Value counts (`COUNT`).
    pub counts: u64,
    /// Transaction statistics.
    pub transactions: TransactionReport,
}

/// Transaction statistics.
#[derive(Debug, Serialize)]
pub struct TransactionReport {
    /// Transactions opened.
    pub started: u64,
    /// Transactions committed.
    pub committed: u64,
    /// Transactions rolled back.
    pub rolled_back: u64,
    /// `COMMIT`/`ROLLBACK` issued with no transaction open.
    pub failed_closes: u64,
    /// Outermost commits written to the store.
    pub flushes: u64,
    /// Operations written to the store.
    pub operations_flushed: u64,
}

impl From<StatsSnapshot> for StatsReport {
    fn from(stats: StatsSnapshot) -> Self {
        Self {
            version: layerkv_core::VERSION,
            reads: stats.reads,
            writes: stats.writes,
            deletes: stats.deletes,
            counts: stats.counts,
            transactions: TransactionReport {
                started: stats.transactions_started,
                committed: stats.transactions_committed,
                rolled_back: stats.transactions_rolled_back,
                failed_closes: stats.failed_closes,
                flushes: stats.flushes,
                operations_flushed: stats.operations_flushed,
            },
        }
    }
}

impl StatsReport {
    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> CliResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
