//! The chain of open transaction frames.

use crate::error::{CoreError, CoreResult};
use crate::transaction::frame::TransactionFrame;
use crate::transaction::operation::{merge_frame, Operation, OperationMap};
use crate::types::TransactionId;
use std::iter;

/// Outcome of committing the innermost frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// The frame was merged into its parent, which is now innermost.
    Merged {
        /// The frame that was committed.
        committed: TransactionId,
        /// The frame it was merged into.
        parent: TransactionId,
    },
    /// The outermost frame was committed and the stack is now empty.
    ///
    /// The caller must write `operations` through to the backing store.
    Flush {
        /// The frame that was committed.
        committed: TransactionId,
        /// The operations to apply to the store.
        operations: OperationMap,
    },
}

/// Open transaction frames, stored as an arena.
///
/// Frames live in a `Vec` with the outermost at index 0 and the innermost
/// last; each frame links to its parent by index. Only the innermost frame
/// is ever handed out mutably, so every ancestor stays frozen until the
/// frames above it are committed or rolled back.
#[derive(Debug)]
pub struct TransactionStack {
    /// Open frames, innermost last.
    frames: Vec<TransactionFrame>,
    /// ID handed to the next frame.
    next_txid: TransactionId,
}

impl Default for TransactionStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            next_txid: TransactionId::new(1),
        }
    }

    /// Returns the nesting depth (0 when no transaction is open).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Checks if at least one transaction is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Returns the innermost frame.
    #[must_use]
    pub fn innermost(&self) -> Option<&TransactionFrame> {
        self.frames.last()
    }

    /// Returns the innermost frame, the only one that accepts writes.
    pub fn innermost_mut(&mut self) -> Option<&mut TransactionFrame> {
        self.frames.last_mut()
    }

    /// Iterates the open frames from innermost to outermost by following
    /// parent links.
    pub fn chain(&self) -> impl Iterator<Item = &TransactionFrame> + '_ {
        iter::successors(self.frames.last(), move |frame| {
            frame.parent().and_then(|index| self.frames.get(index))
        })
    }

    /// Opens a new frame nested in the current innermost one.
    pub fn begin(&mut self) -> TransactionId {
        let id = self.next_txid;
        self.next_txid = id.next();

        let parent = self.frames.len().checked_sub(1);
        self.frames.push(TransactionFrame::new(id, parent));
        id
    }

    /// Commits the innermost frame.
    ///
    /// A nested frame is merged into its parent. The outermost frame is
    /// removed and its operations are returned in [`Commit::Flush`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoOpenTransaction`] if no frame is open; the
    /// stack is left unchanged.
    pub fn commit(&mut self) -> CoreResult<Commit> {
        let frame = self.frames.pop().ok_or(CoreError::NoOpenTransaction)?;
        let committed = frame.id();

        match frame.parent().and_then(|index| self.frames.get_mut(index)) {
            Some(parent) => {
                let parent_id = parent.id();
                frame.merge_into(parent);
                Ok(Commit::Merged {
                    committed,
                    parent: parent_id,
                })
            }
            None => Ok(Commit::Flush {
                committed,
                operations: frame.into_operations(),
            }),
        }
    }

    /// Discards the innermost frame and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoOpenTransaction`] if no frame is open.
    pub fn rollback(&mut self) -> CoreResult<TransactionFrame> {
        self.frames.pop().ok_or(CoreError::NoOpenTransaction)
    }

    /// Drops every open frame without merging anything.
    ///
    /// Returns how many frames were discarded.
    pub fn clear(&mut self) -> usize {
        let depth = self.frames.len();
        self.frames.clear();
        depth
    }

    /// Resolves `key` against the open frames, innermost first.
    ///
    /// Returns the first operation found. `None` means no open frame
    /// touched the key and the backing store decides.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Operation> {
        self.chain().find_map(|frame| frame.lookup(key))
    }

    /// Builds one map holding the effective pending operation of every key
    /// touched by any open frame.
    ///
    /// The fold runs innermost to outermost: each outer frame is taken as
    /// the base and the accumulator of the frames nested inside it is laid
    /// on top, so the deepest write for a key wins exactly as in
    /// [`Self::lookup`].
    #[must_use]
    pub fn composite(&self) -> OperationMap {
        self.chain().fold(OperationMap::new(), |accumulated, frame| {
            merge_frame(frame.snapshot().clone(), accumulated)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stack: &mut TransactionStack, key: &str, operation: Operation) {
        stack
            .innermost_mut()
            .expect("transaction open")
            .record(key, operation);
    }

    #[test]
    fn new_stack_is_closed() {
        let stack = TransactionStack::new();
        assert_eq!(stack.depth(), 0);
        assert!(!stack.is_open());
        assert!(stack.innermost().is_none());
        assert!(stack.composite().is_empty());
    }

    #[test]
    fn begin_nests_frames() {
        let mut stack = TransactionStack::new();
        let outer = stack.begin();
        let inner = stack.begin();

        assert_eq!(stack.depth(), 2);
        assert!(outer < inner);
        assert_eq!(stack.innermost().map(TransactionFrame::id), Some(inner));
        assert_eq!(stack.innermost().and_then(TransactionFrame::parent), Some(0));

        let ids: Vec<_> = stack.chain().map(TransactionFrame::id).collect();
        assert_eq!(ids, vec![inner, outer]);
    }

    #[test]
    fn commit_without_transaction_fails() {
        let mut stack = TransactionStack::new();
        assert_eq!(stack.commit(), Err(CoreError::NoOpenTransaction));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn rollback_without_transaction_fails() {
        let mut stack = TransactionStack::new();
        assert!(matches!(
            stack.rollback(),
            Err(CoreError::NoOpenTransaction)
        ));
    }

    #[test]
    fn commit_nested_merges_into_parent() {
        let mut stack = TransactionStack::new();
        let outer = stack.begin();
        record(&mut stack, "foo", Operation::set("1"));
        let inner = stack.begin();
        record(&mut stack, "foo", Operation::set("2"));
        record(&mut stack, "bar", Operation::Delete);

        let commit = stack.commit().unwrap();

        assert_eq!(
            commit,
            Commit::Merged {
                committed: inner,
                parent: outer
            }
        );
        assert_eq!(stack.depth(), 1);
        let frame = stack.innermost().unwrap();
        assert_eq!(frame.lookup("foo"), Some(&Operation::set("2")));
        assert_eq!(frame.lookup("bar"), Some(&Operation::Delete));
    }

    #[test]
    fn commit_outermost_returns_operations() {
        let mut stack = TransactionStack::new();
        let id = stack.begin();
        record(&mut stack, "foo", Operation::set("1"));
        record(&mut stack, "bar", Operation::Delete);

        let commit = stack.commit().unwrap();

        let expected = OperationMap::from([
            ("foo".to_owned(), Operation::set("1")),
            ("bar".to_owned(), Operation::Delete),
        ]);
        assert_eq!(
            commit,
            Commit::Flush {
                committed: id,
                operations: expected
            }
        );
        assert!(!stack.is_open());
    }

    #[test]
    fn rollback_discards_innermost_only() {
        let mut stack = TransactionStack::new();
        stack.begin();
        record(&mut stack, "foo", Operation::set("outer"));
        stack.begin();
        record(&mut stack, "foo", Operation::set("inner"));

        let discarded = stack.rollback().unwrap();

        assert_eq!(discarded.lookup("foo"), Some(&Operation::set("inner")));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.lookup("foo"), Some(&Operation::set("outer")));
    }

    #[test]
    fn lookup_innermost_wins() {
        let mut stack = TransactionStack::new();
        stack.begin();
        record(&mut stack, "foo", Operation::set("1"));
        record(&mut stack, "bar", Operation::set("1"));
        stack.begin();
        record(&mut stack, "foo", Operation::Delete);
        stack.begin();

        assert_eq!(stack.lookup("foo"), Some(&Operation::Delete));
        assert_eq!(stack.lookup("bar"), Some(&Operation::set("1")));
        assert_eq!(stack.lookup("baz"), None);
    }

    #[test]
    fn composite_matches_lookup_across_depths() {
        let mut stack = TransactionStack::new();
        stack.begin();
        record(&mut stack, "a", Operation::set("1"));
        record(&mut stack, "b", Operation::set("1"));
        record(&mut stack, "c", Operation::Delete);
        stack.begin();
        record(&mut stack, "a", Operation::set("2"));
        record(&mut stack, "c", Operation::set("3"));
        stack.begin();
        record(&mut stack, "a", Operation::set("3"));
        record(&mut stack, "b", Operation::Delete);

        let composite = stack.composite();

        assert_eq!(composite.len(), 3);
        for (key, operation) in &composite {
            assert_eq!(stack.lookup(key), Some(operation));
        }
        assert_eq!(composite.get("a"), Some(&Operation::set("3")));
        assert_eq!(composite.get("b"), Some(&Operation::Delete));
        assert_eq!(composite.get("c"), Some(&Operation::set("3")));
    }

    #[test]
    fn clear_drops_all_frames() {
        let mut stack = TransactionStack::new();
        stack.begin();
        stack.begin();
        stack.begin();

        assert_eq!(stack.clear(), 3);
        assert_eq!(stack.depth(), 0);
        assert!(stack.lookup("foo").is_none());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut stack = TransactionStack::new();
        let first = stack.begin();
        stack.rollback().unwrap();
        let second = stack.begin();
        assert!(second > first);
    }
}
