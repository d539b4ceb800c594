use super::entity::{CatalogIndex, CatalogItem};
use crate::domain::{DomainError, DomainResult};

/// Validates a remote record before it may enter the in-memory catalog
pub fn validate_catalog_item(item: &CatalogItem) -> DomainResult<()> {
    if item.id == 0 {
        return Err(DomainError::InvariantViolation(
            "Catalog id must be positive".to_string(),
        ));
    }
    if item.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(format!(
            "Catalog item {} has an empty name",
            item.id
        )));
    }
    if item.types.is_empty() {
        return Err(DomainError::InvariantViolation(format!(
            "Catalog item {} has no types",
            item.id
        )));
    }
    if item.types.iter().any(|t| t.trim().is_empty()) {
        return Err(DomainError::InvariantViolation(format!(
            "Catalog item {} has an empty type tag",
            item.id
        )));
    }
    Ok(())
}

/// A load session needs at least one entry to fetch
pub fn validate_catalog_index(index: &CatalogIndex) -> DomainResult<()> {
    if index.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Catalog index is empty".to_string(),
        ));
    }
    Ok(())
}

/// Invariants that must hold for catalog data:
///
/// 1. Ids are positive
/// 2. Names are not blank
/// 3. Every item has at least one non-empty type; the first is primary
/// 4. A load session starts from a non-empty index
