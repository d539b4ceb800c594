// src/application/state.rs
//
// Application state: every service, wired once at startup.

use std::sync::{Arc, Mutex};

use crate::config::AppConfig;
use crate::db::{create_connection_pool, get_connection, initialize_database, verify_database_integrity};
use crate::domain::Selection;
use crate::error::AppResult;
use crate::events::EventBus;
use crate::integrations::{CatalogClient, PokeApiClient};
use crate::repositories::{InMemoryKeyValueStore, KeyValueStore, SqliteKeyValueStore};
use crate::services::{
    CatalogLoader, CollectionService, ExportService, LoaderConfig, StatisticsService,
};

/// Application state shared by the command handlers.
/// All services are Arc-wrapped for sharing across tasks.
pub struct AppState {
    pub config: AppConfig,
    pub event_bus: Arc<EventBus>,
    pub catalog_loader: Arc<CatalogLoader>,
    pub collection_service: Arc<CollectionService>,
    pub statistics_service: Arc<StatisticsService>,
    pub export_service: Arc<ExportService>,
    /// Records ticked for bulk release on the collection page
    pub selection: Mutex<Selection>,
}

impl AppState {
    /// Build the production state: PokeAPI client plus durable storage
    pub fn initialize(config: AppConfig) -> AppResult<Self> {
        let client: Arc<dyn CatalogClient> =
            Arc::new(PokeApiClient::new(&config.api_base_url, config.request_timeout)?);
        let store = open_store(&config);
        Ok(Self::assemble(config, client, store))
    }

    /// Wire the services around an explicit client and store
    pub fn assemble(
        config: AppConfig,
        client: Arc<dyn CatalogClient>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        // 1. INFRASTRUCTURE
        let event_bus = Arc::new(EventBus::new());

        // 2. SERVICES
        let catalog_loader = Arc::new(CatalogLoader::new(
            client,
            event_bus.clone(),
            LoaderConfig::from(&config),
        ));
        let collection_service = Arc::new(CollectionService::initialize(store, event_bus.clone()));
        let statistics_service = Arc::new(StatisticsService::new(
            collection_service.clone(),
            config.total_available,
        ));
        let export_service = Arc::new(ExportService::new(event_bus.clone()));

        Self {
            config,
            event_bus,
            catalog_loader,
            collection_service,
            statistics_service,
            export_service,
            selection: Mutex::new(Selection::new()),
        }
    }

    /// Stop background loading and flush the collection
    pub fn shutdown(&self) {
        self.catalog_loader.cancel();
        self.collection_service.shutdown();
    }
}

/// SQLite-backed store, or an in-memory one if the database cannot be opened
pub fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    match open_sqlite_store(config) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::warn!("Persistent storage unavailable, keeping the collection in memory: {}", e);
            Arc::new(InMemoryKeyValueStore::new())
        }
    }
}

fn open_sqlite_store(config: &AppConfig) -> AppResult<SqliteKeyValueStore> {
    let path = config.resolve_database_path()?;
    let pool = Arc::new(create_connection_pool(&path)?);
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
        verify_database_integrity(&conn)?;
    }

    log::info!("Using database at {}", path.display());
    Ok(SqliteKeyValueStore::new(pool))
}
