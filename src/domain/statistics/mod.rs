//! Statistics are derived data:
//!
//! 1. Always recomputable from the collection
//! 2. Never persisted as a source of truth
//! 3. Empty input yields zeros and absent extremes, never a division by zero

pub mod entity;

pub use entity::{CollectionStatistics, TypeCount, NO_TYPE};
