//! Catalog Invariants:
//!
//! 1. Catalog items are immutable snapshots of remote data
//! 2. Remote data is validated before it is merged anywhere
//! 3. The index defines fetch order; the default display order is id ascending

pub mod entity;
pub mod invariants;

pub use entity::{BaseStat, CatalogIndex, CatalogItem, IndexEntry};
pub use invariants::{validate_catalog_index, validate_catalog_item};
