//! Benchmark utilities.

use layerkv_core::StorageEngine;
use rand::Rng;

/// Generate `count` keys named `key_0..key_{count-1}`.
pub fn generate_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key_{i}")).collect()
}

/// Pick a random value out of `distinct` possible ones.
pub fn random_value(distinct: usize) -> String {
    let mut rng = rand::thread_rng();
    format!("value_{}", rng.gen_range(0..distinct.max(1)))
}

/// Build an engine with `keys` committed to the store and `depth` open
/// transactions, each overwriting `writes_per_frame` random keys.
///
/// With no keys the frames are opened empty.
pub fn layered_engine(keys: &[String], depth: usize, writes_per_frame: usize) -> StorageEngine {
    let mut rng = rand::thread_rng();
    let mut engine = StorageEngine::in_memory();
    for key in keys {
        engine.put(key, &random_value(16));
    }

    for _ in 0..depth {
        engine.begin();
        if keys.is_empty() {
            continue;
        }
        for _ in 0..writes_per_frame {
            let key = &keys[rng.gen_range(0..keys.len())];
            if rng.gen_bool(0.2) {
                engine.remove(key);
            } else {
                engine.put(key, &random_value(16));
            }
        }
    }
    engine
}
