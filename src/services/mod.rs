// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_loader;
pub mod collection_service;
pub mod export_service;
pub mod filter_service;
pub mod statistics_service;

#[cfg(test)]
mod catalog_loader_tests;

// Re-export all services and their types
pub use catalog_loader::{
    CatalogLoader,
    CatalogSnapshot,
    LoadProgress,
    LoaderConfig,
};

pub use collection_service::{
    CollectionService,
    STORAGE_KEY,
};

pub use filter_service::{
    apply,
    apply_owned,
    apply_with_ownership,
    Filterable,
};

pub use statistics_service::{
    calculate_statistics,
    StatisticsService,
};

pub use export_service::{
    escape_field,
    export_filename,
    to_delimited_text,
    ExportService,
};
