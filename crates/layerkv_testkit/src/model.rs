//! Reference model of nested transactions.
//!
//! The model keeps a full copy of the visible map per open transaction:
//! `BEGIN` clones the current view, `COMMIT` replaces the parent view with
//! the child view and `ROLLBACK` drops the child view. It is slow and
//! obviously correct, which makes it a good oracle for the engine.

use crate::fixtures::seed_entries;
use crate::generators::Step;
use std::collections::HashMap;

/// A copy-on-begin model of the engine's visible state.
#[derive(Debug, Clone, Default)]
pub struct ReferenceModel {
    /// What the backing store holds.
    committed: HashMap<String, String>,
    /// One full view per open transaction, innermost last.
    views: Vec<HashMap<String, String>>,
}

impl ReferenceModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a model matching [`crate::fixtures::seeded_engine`].
    #[must_use]
    pub fn seeded(size: usize) -> Self {
        Self {
            committed: seed_entries(size),
            views: Vec::new(),
        }
    }

    /// Returns the transaction depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.views.len()
    }

    /// Returns what the backing store should hold.
    #[must_use]
    pub fn committed(&self) -> &HashMap<String, String> {
        &self.committed
    }

    /// Returns the visible value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.view().get(key).cloned()
    }

    /// Returns how many keys visibly hold `value`.
    #[must_use]
    pub fn count(&self, value: &str) -> usize {
        self.view().values().filter(|v| *v == value).count()
    }

    /// Applies one step.
    ///
    /// Returns `false` when a commit or rollback found no open transaction.
    pub fn apply(&mut self, step: &Step) -> bool {
        match step {
            Step::Put(key, value) => {
                self.view_mut().insert(key.clone(), value.clone());
            }
            Step::Remove(key) => {
                self.view_mut().remove(key);
            }
            Step::Begin => {
                let view = self.view().clone();
                self.views.push(view);
            }
            Step::Commit => {
                let Some(view) = self.views.pop() else {
                    return false;
                };
                match self.views.last_mut() {
                    Some(parent) => *parent = view,
                    None => self.committed = view,
                }
            }
            Step::Rollback => {
                if self.views.pop().is_none() {
                    return false;
                }
            }
            Step::Clear => {
                self.views.clear();
                self.committed.clear();
            }
        }
        true
    }

    fn view(&self) -> &HashMap<String, String> {
        self.views.last().unwrap_or(&self.committed)
    }

    fn view_mut(&mut self) -> &mut HashMap<String, String> {
        self.views.last_mut().unwrap_or(&mut self.committed)
    }
}
