//! Pending operations and the frame overlay primitive.

use crate::types::{Key, Value};
use std::collections::HashMap;

/// A pending change to one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// The key's effective value is the given value.
    Set(Value),
    /// The key is effectively absent.
    Delete,
}

impl Operation {
    /// Creates a `Set` operation.
    #[must_use]
    pub fn set(value: impl Into<Value>) -> Self {
        Self::Set(value.into())
    }

    /// Returns the effective value this operation leaves behind.
    ///
    /// `Delete` has no effective value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Set(value) => Some(value),
            Self::Delete => None,
        }
    }

    /// Checks if this is a deletion.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete)
    }
}

/// Pending operations keyed by the key they apply to.
pub type OperationMap = HashMap<Key, Operation>;

/// Overlays `overlay` on top of `base` and returns the result.
///
/// Every overlay entry replaces or inserts into `base`; entries of `base`
/// with no counterpart in `overlay` are kept. `Delete` entries are carried
/// over like any other operation, so a deletion in the overlay keeps
/// shadowing whatever sits below `base`.
///
/// This is the one merge rule of the engine: a committing child is merged
/// into its parent with it, and the composite snapshot used for counting
/// is folded with it.
#[must_use]
pub fn merge_frame<I>(mut base: OperationMap, overlay: I) -> OperationMap
where
    I: IntoIterator<Item = (Key, Operation)>,
{
    base.extend(overlay);
    base
}
