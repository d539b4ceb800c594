// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod catalog;
pub mod filter;
pub mod owned;
pub mod statistics;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Catalog Domain (remote data)
pub use catalog::{
    validate_catalog_index, validate_catalog_item, BaseStat, CatalogIndex, CatalogItem,
    IndexEntry,
};

// Owned Domain (the user's collection)
pub use owned::{OwnedRecord, OwnedStats, Selection, TagCounts};

// Filter Domain (view state)
pub use filter::{CatchStatus, FilterState, SortKey};

// Statistics Domain (Derived Data)
pub use statistics::{CollectionStatistics, TypeCount, NO_TYPE};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
