use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A Pokémon as published by the remote catalog.
/// Read-only once fetched; the core never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalog identifier (national dex number), always positive
    pub id: u32,

    /// Display name as returned by the API (lower-case, hyphenated)
    pub name: String,

    /// Type tags in slot order; the first one is the primary type
    pub types: Vec<String>,

    /// Height in decimetres
    pub height: u32,

    /// Weight in hectograms
    pub weight: u32,

    /// Base stats in API order
    pub stats: Vec<BaseStat>,

    /// Representative image URL
    pub image: String,

    pub base_experience: Option<u32>,
}

/// One named base statistic (hp, attack, special-defense, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStat {
    pub name: String,
    pub value: u32,
}

impl BaseStat {
    pub fn new(name: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl CatalogItem {
    /// Create an item with no stats, no image and zero size.
    pub fn new(id: u32, name: impl Into<String>, types: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            types,
            height: 0,
            weight: 0,
            stats: Vec::new(),
            image: String::new(),
            base_experience: None,
        }
    }

    pub fn with_size(mut self, height: u32, weight: u32) -> Self {
        self.height = height;
        self.weight = weight;
        self
    }

    pub fn with_stats(mut self, stats: Vec<BaseStat>) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Look up a base stat by its API name
    pub fn stat(&self, name: &str) -> Option<u32> {
        self.stats.iter().find(|s| s.name == name).map(|s| s.value)
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// True when the item carries at least one of the given tags
    pub fn has_any_type(&self, tags: &BTreeSet<String>) -> bool {
        self.types.iter().any(|t| tags.contains(t))
    }
}

/// One row of the paginated catalog listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,

    /// URL of the detail record
    pub detail_ref: String,
}

impl IndexEntry {
    pub fn new(name: impl Into<String>, detail_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail_ref: detail_ref.into(),
        }
    }
}

/// The catalog listing that drives batch loading.
/// Entry order is the fetch order, not the display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogIndex {
    /// Total number of records the remote reports (may exceed `entries.len()`)
    pub total_count: usize,
    pub entries: Vec<IndexEntry>,
}

impl CatalogIndex {
    pub fn new(total_count: usize, entries: Vec<IndexEntry>) -> Self {
        Self {
            total_count,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}
