// src/lib.rs
// Pokédex - Local-first Pokémon catalog and collection tracker
//
// Architecture:
// - Domain-centric: entities, value objects and invariants live in domain/
// - Event-driven: services report what happened on a synchronous event bus
// - Explicit: no ambient global state, every service is wired in AppState
// - Local-first: the collection is stored on the user's machine
// - Application Layer: UI boundary (commands, DTOs, error responses)

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// BOUNDARIES
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_catalog_index,
    validate_catalog_item,
    // Catalog
    BaseStat,
    CatalogIndex,
    CatalogItem,
    // Filter
    CatchStatus,
    // Statistics
    CollectionStatistics,
    DomainError,
    FilterState,
    IndexEntry,
    // Collection
    OwnedRecord,
    OwnedStats,
    Selection,
    SortKey,
    TagCounts,
    TypeCount,
};

// ============================================================================
// PUBLIC API - Configuration and Errors
// ============================================================================

pub use config::AppConfig;
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    // Catalog loading
    CatalogBatchMerged,
    CatalogBatchSkipped,
    CatalogLoadCompleted,
    CatalogLoadFailed,
    CatalogLoadStarted,
    // Collection
    CollectionExported,
    DomainEvent,
    EventBus,
    EventLogEntry,
    PokemonCaptured,
    PokemonNoteUpdated,
    PokemonReleased,
};

// ============================================================================
// PUBLIC API - Storage
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

pub use repositories::{InMemoryKeyValueStore, KeyValueStore, SqliteKeyValueStore};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    calculate_statistics,
    to_delimited_text,
    // Catalog Loader
    CatalogLoader,
    CatalogSnapshot,
    // Collection Service
    CollectionService,
    // Export Service
    ExportService,
    LoadProgress,
    LoaderConfig,
    // Statistics Service
    StatisticsService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, ErrorResponse};

pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{CatalogClient, PokeApiClient};
