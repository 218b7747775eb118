//! A single level of transaction nesting.

use crate::transaction::operation::{merge_frame, Operation, OperationMap};
use crate::types::{Key, TransactionId};
use std::mem;

/// The pending operations recorded at one nesting depth.
///
/// A frame holds at most one operation per key: recording a second
/// operation for the same key replaces the first. The parent link is the
/// index of the enclosing frame in the owning [`super::TransactionStack`];
/// the parent always outlives the child.
#[derive(Debug, Clone)]
pub struct TransactionFrame {
    /// Transaction ID.
    id: TransactionId,
    /// Index of the enclosing frame, `None` for the outermost.
    parent: Option<usize>,
    /// Pending operations: key -> most recent operation at this depth.
    operations: OperationMap,
}

impl TransactionFrame {
    /// Creates an empty frame.
    pub(crate) fn new(id: TransactionId, parent: Option<usize>) -> Self {
        Self {
            id,
            parent,
            operations: OperationMap::new(),
        }
    }

    /// Returns the transaction ID.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the stack index of the enclosing frame.
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Records an operation, replacing any earlier one for the same key.
    pub fn record(&mut self, key: impl Into<Key>, operation: Operation) {
        self.operations.insert(key.into(), operation);
    }

    /// Returns this frame's own operation for `key`.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Operation> {
        self.operations.get(key)
    }

    /// Returns every operation recorded in this frame.
    #[must_use]
    pub fn snapshot(&self) -> &OperationMap {
        &self.operations
    }

    /// Returns the number of keys touched in this frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Checks if nothing was recorded in this frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Absorbs this frame into `parent`.
    ///
    /// Child entries replace the parent's entries for the same key.
    pub fn merge_into(self, parent: &mut TransactionFrame) {
        let base = mem::take(&mut parent.operations);
        parent.operations = merge_frame(base, self.operations);
    }

    /// Consumes the frame, returning its operations.
    pub(crate) fn into_operations(self) -> OperationMap {
        self.operations
    }
}
