//! Nested transactions over a flat key-value store.
//!
//! A transaction is a [`TransactionFrame`] holding at most one pending
//! [`Operation`] per key. Frames nest inside a [`TransactionStack`]; only
//! the innermost frame accepts writes. Committing a nested frame merges it
//! into its parent, committing the outermost frame hands its operations
//! back to the caller to flush, and rolling back drops the frame.

mod frame;
mod operation;
mod stack;

pub use frame::TransactionFrame;
pub use operation::{merge_frame, Operation, OperationMap};
pub use stack::{Commit, TransactionStack};
