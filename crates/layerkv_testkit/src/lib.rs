//! # layerkv Testkit
//!
//! Test utilities for layerkv.
//!
//! This crate provides:
//! - Engine fixtures seeded with known data
//! - Property-based test generators using proptest
//! - A naive reference model of nested transactions for differential tests
//!
//! ## Usage
//!
//! ```rust
//! use layerkv_testkit::prelude::*;
//!
//! let mut engine = seeded_engine(3);
//! let mut model = ReferenceModel::seeded(3);
//!
//! for step in [Step::Begin, Step::Remove("key_1".into()), Step::Rollback] {
//!     apply_step(&mut engine, &step);
//!     model.apply(&step);
//! }
//! assert_eq!(engine.get("key_1"), model.get("key_1"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod model;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::model::*;
}

pub use fixtures::*;
pub use generators::*;
pub use model::*;
