//! Critical Collection Invariants:
//!
//! 1. At most one OwnedRecord per id
//! 2. Records are snapshots; later catalog changes never reach them
//! 3. The capture timestamp never changes; only the note is mutable
//! 4. Duplicate capture, release of an absent id and annotating an absent id are no-ops

pub mod entity;
pub mod selection;

pub use entity::{OwnedRecord, OwnedStats, TagCounts};
pub use selection::Selection;
