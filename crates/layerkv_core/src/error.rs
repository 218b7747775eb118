//! Error types for layerkv core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in layerkv core operations.
///
/// Only closing a transaction can fail. Reads, writes, counts, `clear`
/// and `begin` are total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Commit or rollback was requested with no transaction open.
    #[error("no transaction")]
    NoOpenTransaction,
}
