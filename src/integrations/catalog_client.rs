// src/integrations/catalog_client.rs
//
// Remote catalog contract consumed by the catalog loader.
// All operations are idempotent reads; any call may fail on its own.

use async_trait::async_trait;

use crate::domain::{CatalogIndex, CatalogItem};
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// First `limit` index entries plus the remote's total count
    async fn list_index(&self, limit: u32) -> AppResult<CatalogIndex>;

    /// Detail record behind an index entry's reference
    async fn fetch_detail_by_ref(&self, detail_ref: &str) -> AppResult<CatalogItem>;

    async fn fetch_detail_by_id(&self, id: u32) -> AppResult<CatalogItem>;

    /// Every type tag the catalog knows about
    async fn list_categories(&self) -> AppResult<Vec<String>>;
}
