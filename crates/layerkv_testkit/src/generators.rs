//! Property-based test generators using proptest.
//!
//! Keys and values are drawn from small pools so random sequences keep
//! colliding on the same keys across transaction depths.

use layerkv_core::StorageEngine;
use proptest::prelude::*;

/// Keys used by the generated steps.
pub const KEY_POOL: [&str; 5] = ["foo", "bar", "baz", "key_1", "key_2"];

/// Values used by the generated steps.
pub const VALUE_POOL: [&str; 4] = ["123", "456", "789", "value_1"];

/// One engine call in a generated sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `put(key, value)`
    Put(String, String),
    /// `remove(key)`
    Remove(String),
    /// `begin()`
    Begin,
    /// `commit()`
    Commit,
    /// `rollback()`
    Rollback,
    /// `clear()`
    Clear,
}

/// Applies one step to the engine.
///
/// Returns `false` when a commit or rollback found no open transaction.
pub fn apply_step(engine: &mut StorageEngine, step: &Step) -> bool {
    match step {
        Step::Put(key, value) => engine.put(key, value),
        Step::Remove(key) => engine.remove(key),
        Step::Begin => {
            engine.begin();
        }
        Step::Commit => return engine.commit().is_ok(),
        Step::Rollback => return engine.rollback().is_ok(),
        Step::Clear => engine.clear(),
    }
    true
}

/// Strategy for keys from [`KEY_POOL`].
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(KEY_POOL.to_vec()).prop_map(str::to_owned)
}

/// Strategy for values from [`VALUE_POOL`].
pub fn value_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(VALUE_POOL.to_vec()).prop_map(str::to_owned)
}

/// Strategy for a single step, weighted towards writes.
///
/// `Clear` is excluded; use [`step_with_clear_strategy`] to include it.
pub fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (key_strategy(), value_strategy()).prop_map(|(k, v)| Step::Put(k, v)),
        2 => key_strategy().prop_map(Step::Remove),
        2 => Just(Step::Begin),
        1 => Just(Step::Commit),
        1 => Just(Step::Rollback),
    ]
}

/// Strategy for a single step that may also clear the engine.
pub fn step_with_clear_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        20 => step_strategy(),
        1 => Just(Step::Clear),
    ]
}

/// Strategy for a sequence of steps without `Clear`.
pub fn step_sequence_strategy(
    min_steps: usize,
    max_steps: usize,
) -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step_strategy(), min_steps..max_steps)
}

/// Case counts and sequence lengths for engine property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Generated step sequences per test.
    pub cases: u32,
    /// Upper bound on shrink attempts after a failing sequence.
    pub max_shrink_iters: u32,
    /// Longest step sequence to generate.
    pub max_steps: usize,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
            max_steps: 80,
        }
    }
}

impl PropTestConfig {
    /// Few short sequences, for unit tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
            max_steps: 30,
        }
    }

    /// Many long sequences, for soak runs.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10_000,
            max_steps: 400,
        }
    }

    /// Step sequences without `Clear`, up to `max_steps` long.
    pub fn steps(&self) -> impl Strategy<Value = Vec<Step>> {
        step_sequence_strategy(0, self.max_steps)
    }

    /// Step sequences that may clear the engine, up to `max_steps` long.
    pub fn steps_with_clear(&self) -> impl Strategy<Value = Vec<Step>> {
        prop::collection::vec(step_with_clear_strategy(), 0..self.max_steps)
    }

    /// Converts to proptest config. Failing cases are not persisted.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            failure_persistence: None,
            ..ProptestConfig::default()
        }
    }
}
