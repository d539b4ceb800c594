// src/services/catalog_loader.rs
//
// Catalog Loader - progressive loading of the remote catalog
//
// CRITICAL RULES:
// - The first batch is awaited by the caller; the rest streams in a background task
// - Batches are merged strictly in index order; items within a batch race
// - A failed item or a failed batch never aborts the session
// - Every merge checks the session generation under the state lock;
//   a superseded session never touches the catalog again
// - The catalog never holds two items with the same id

use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::task::{JoinHandle, JoinSet};

use crate::config::AppConfig;
use crate::domain::{validate_catalog_index, validate_catalog_item, CatalogIndex, CatalogItem};
use crate::error::{AppError, AppResult};
use crate::events::{
    CatalogBatchMerged, CatalogBatchSkipped, CatalogLoadCompleted, CatalogLoadFailed,
    CatalogLoadStarted, EventBus,
};
use crate::integrations::CatalogClient;

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// How many index entries to request
    pub index_limit: u32,
    /// Entries fetched before `start_load` returns
    pub initial_batch_size: usize,
    /// Entries per background batch
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            index_limit: 1000,
            initial_batch_size: 50,
            batch_size: 50,
        }
    }
}

impl From<&AppConfig> for LoaderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            index_limit: config.index_limit,
            initial_batch_size: config.initial_batch_size.max(1),
            batch_size: config.batch_size.max(1),
        }
    }
}

/// Progress of the current load session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadProgress {
    /// Number of index entries scheduled for this session
    pub total: usize,
    /// Distinct items merged so far; never decreases within a session
    pub loaded: usize,
}

impl LoadProgress {
    pub fn is_complete(&self) -> bool {
        self.loaded == self.total
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.loaded as f64 / self.total as f64 * 100.0
    }
}

/// Point-in-time copy of the loader state for the presentation layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub generation: u64,
    pub items: Vec<CatalogItem>,
    pub progress: LoadProgress,
    pub is_loading: bool,
    /// Terminal session error, if any
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct LoaderState {
    generation: u64,
    items: Vec<CatalogItem>,
    known_ids: HashSet<u32>,
    progress: LoadProgress,
    is_loading: bool,
    error: Option<String>,
}

impl LoaderState {
    /// Append the items not yet present; returns how many were added.
    /// `total` grows with `loaded` so the progress never overshoots.
    fn merge(&mut self, batch: Vec<CatalogItem>) -> usize {
        let mut merged = 0;
        for item in batch {
            if self.known_ids.insert(item.id) {
                self.items.push(item);
                merged += 1;
            }
        }
        self.progress.loaded = self.items.len();
        self.progress.total = self.progress.total.max(self.progress.loaded);
        merged
    }

    fn find(&self, id: u32) -> Option<&CatalogItem> {
        if !self.known_ids.contains(&id) {
            return None;
        }
        self.items.iter().find(|item| item.id == id)
    }
}

struct BatchOutcome {
    items: Vec<CatalogItem>,
    failed: usize,
}

type SharedState = Arc<RwLock<LoaderState>>;

pub struct CatalogLoader {
    client: Arc<dyn CatalogClient>,
    event_bus: Arc<EventBus>,
    config: LoaderConfig,
    state: SharedState,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl CatalogLoader {
    pub fn new(client: Arc<dyn CatalogClient>, event_bus: Arc<EventBus>, config: LoaderConfig) -> Self {
        Self {
            client,
            event_bus,
            config,
            state: Arc::new(RwLock::new(LoaderState::default())),
            task_handle: Mutex::new(None),
        }
    }

    // ========================================================================
    // SESSIONS
    // ========================================================================

    /// Fetch the index, then load it as a new session.
    ///
    /// Returns once the initial batch is merged.
    pub async fn load_catalog(&self) -> AppResult<CatalogSnapshot> {
        let generation = self.begin_session(0);

        let index = match self.client.list_index(self.config.index_limit).await {
            Ok(index) => index,
            Err(e) => {
                let err = AppError::IndexFetch(e.to_string());
                return Err(self.fail_session(generation, err));
            }
        };

        if let Err(e) = validate_catalog_index(&index) {
            return Err(self.fail_session(generation, AppError::Domain(e)));
        }

        self.run_session(generation, index).await
    }

    /// Start a session over an already fetched index, superseding any
    /// running session.
    ///
    /// Returns once the initial batch is merged; the remainder streams in
    /// the background.
    pub async fn start_load(&self, index: CatalogIndex) -> AppResult<CatalogSnapshot> {
        validate_catalog_index(&index)?;
        let generation = self.begin_session(index.len());
        self.run_session(generation, index).await
    }

    /// Stop the running session. Already merged items stay available.
    pub fn cancel(&self) {
        self.abort_background();
        let mut state = write_state(&self.state);
        state.generation += 1;
        state.is_loading = false;
        log::info!("Catalog load cancelled (generation now {})", state.generation);
    }

    /// Wait for the background part of the current session to finish
    pub async fn wait_for_background(&self) {
        let handle = self
            .task_handle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    log::error!("Background catalog load task failed: {}", e);
                }
            }
        }
    }

    fn begin_session(&self, total: usize) -> u64 {
        self.abort_background();

        let mut state = write_state(&self.state);
        state.generation += 1;
        state.items.clear();
        state.known_ids.clear();
        state.progress = LoadProgress { total, loaded: 0 };
        state.is_loading = true;
        state.error = None;

        log::info!("Catalog load session {} started", state.generation);
        state.generation
    }

    async fn run_session(&self, generation: u64, index: CatalogIndex) -> AppResult<CatalogSnapshot> {
        let total = index.len();
        {
            let mut state = write_state(&self.state);
            if state.generation != generation {
                return Err(AppError::LoadCancelled { generation });
            }
            // items fetched on demand while the index was loading stay counted
            state.progress.total = total.max(state.items.len());
        }
        self.event_bus.emit(CatalogLoadStarted::new(generation, total));

        let mut refs: Vec<String> = index.entries.into_iter().map(|e| e.detail_ref).collect();
        let initial_len = self.config.initial_batch_size.max(1).min(refs.len());
        let remainder = refs.split_off(initial_len);

        let attempted = refs.len();
        let outcome = fetch_batch(&self.client, refs).await;

        if outcome.items.is_empty() {
            let err = AppError::InitialBatchFailed { attempted };
            return Err(self.fail_session(generation, err));
        }

        let failed = outcome.failed;
        let (merged, progress) = merge_if_current(&self.state, generation, outcome.items)
            .ok_or(AppError::LoadCancelled { generation })?;
        self.event_bus.emit(CatalogBatchMerged::new(
            generation,
            0,
            merged,
            failed,
            progress.loaded,
            progress.total,
        ));
        if failed > 0 {
            log::warn!("Initial batch: {} of {} items failed", failed, attempted);
        }

        if remainder.is_empty() {
            finish_session(&self.state, &self.event_bus, generation);
        } else {
            let batches: Vec<Vec<String>> = remainder
                .chunks(self.config.batch_size.max(1))
                .map(|chunk| chunk.to_vec())
                .collect();
            self.spawn_background(generation, batches);
        }

        Ok(self.snapshot())
    }

    fn spawn_background(&self, generation: u64, batches: Vec<Vec<String>>) {
        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.state);
        let event_bus = Arc::clone(&self.event_bus);

        let task = tokio::spawn(async move {
            load_remaining(client, state, event_bus, generation, batches).await;
        });

        let mut handle = self.task_handle.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = handle.replace(task) {
            previous.abort();
        }
    }

    fn abort_background(&self) {
        let mut handle = self.task_handle.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = handle.take() {
            task.abort();
        }
    }

    /// Record a terminal error for the session if it is still current
    fn fail_session(&self, generation: u64, err: AppError) -> AppError {
        {
            let mut state = write_state(&self.state);
            if state.generation != generation {
                return AppError::LoadCancelled { generation };
            }
            state.is_loading = false;
            state.error = Some(err.to_string());
        }

        log::error!("Catalog load session {} failed: {}", generation, err);
        self.event_bus
            .emit(CatalogLoadFailed::new(generation, err.to_string()));
        err
    }

    // ========================================================================
    // ON-DEMAND
    // ========================================================================

    /// Return a loaded item, or fetch and merge it.
    ///
    /// An item fetched while a newer session started is returned but not merged.
    pub async fn fetch_one(&self, id: u32) -> AppResult<CatalogItem> {
        let generation = {
            let state = read_state(&self.state);
            if let Some(item) = state.find(id) {
                return Ok(item.clone());
            }
            state.generation
        };

        let item = self.client.fetch_detail_by_id(id).await?;
        validate_catalog_item(&item)?;

        let mut state = write_state(&self.state);
        if state.generation != generation {
            return Ok(item);
        }
        // the background loader may have merged it meanwhile
        if let Some(existing) = state.find(item.id) {
            return Ok(existing.clone());
        }

        state.merge(vec![item.clone()]);
        Ok(item)
    }

    /// Every type tag the remote catalog knows about
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        self.client.list_categories().await
    }

    // ========================================================================
    // READ ACCESS
    // ========================================================================

    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = read_state(&self.state);
        CatalogSnapshot {
            generation: state.generation,
            items: state.items.clone(),
            progress: state.progress,
            is_loading: state.is_loading,
            error: state.error.clone(),
        }
    }

    pub fn items(&self) -> Vec<CatalogItem> {
        read_state(&self.state).items.clone()
    }

    pub fn progress(&self) -> LoadProgress {
        read_state(&self.state).progress
    }

    pub fn is_loading(&self) -> bool {
        read_state(&self.state).is_loading
    }

    pub fn error(&self) -> Option<String> {
        read_state(&self.state).error.clone()
    }

    pub fn generation(&self) -> u64 {
        read_state(&self.state).generation
    }
}

impl Drop for CatalogLoader {
    fn drop(&mut self) {
        self.abort_background();
    }
}

// ============================================================================
// BACKGROUND WORK
// ============================================================================

async fn load_remaining(
    client: Arc<dyn CatalogClient>,
    state: SharedState,
    event_bus: Arc<EventBus>,
    generation: u64,
    batches: Vec<Vec<String>>,
) {
    for (offset, batch) in batches.into_iter().enumerate() {
        let batch_index = offset + 1;
        if !is_current(&state, generation) {
            log::debug!("Session {} superseded before batch {}", generation, batch_index);
            return;
        }

        let attempted = batch.len();
        let outcome = fetch_batch(&client, batch).await;

        if outcome.items.is_empty() {
            if !is_current(&state, generation) {
                return;
            }
            log::warn!(
                "Batch {} of session {} failed entirely ({} items), skipping",
                batch_index,
                generation,
                attempted
            );
            event_bus.emit(CatalogBatchSkipped::new(generation, batch_index, attempted));
            continue;
        }

        let failed = outcome.failed;
        match merge_if_current(&state, generation, outcome.items) {
            Some((merged, progress)) => {
                event_bus.emit(CatalogBatchMerged::new(
                    generation,
                    batch_index,
                    merged,
                    failed,
                    progress.loaded,
                    progress.total,
                ));
            }
            None => {
                log::debug!("Discarding batch {} of superseded session {}", batch_index, generation);
                return;
            }
        }
    }

    finish_session(&state, &event_bus, generation);
}

/// Fetch every reference concurrently; failures are counted, not raised
async fn fetch_batch(client: &Arc<dyn CatalogClient>, refs: Vec<String>) -> BatchOutcome {
    let mut tasks = JoinSet::new();
    for detail_ref in refs {
        let client = Arc::clone(client);
        tasks.spawn(async move {
            let result = client.fetch_detail_by_ref(&detail_ref).await;
            (detail_ref, result)
        });
    }

    let mut items = Vec::new();
    let mut failed = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((detail_ref, Ok(item))) => match validate_catalog_item(&item) {
                Ok(()) => items.push(item),
                Err(e) => {
                    failed += 1;
                    log::warn!("Rejected malformed record from {}: {}", detail_ref, e);
                }
            },
            Ok((detail_ref, Err(e))) => {
                failed += 1;
                log::debug!("Failed to fetch {}: {}", detail_ref, e);
            }
            Err(e) => {
                failed += 1;
                log::warn!("Fetch task did not complete: {}", e);
            }
        }
    }

    BatchOutcome { items, failed }
}

fn merge_if_current(
    state: &RwLock<LoaderState>,
    generation: u64,
    items: Vec<CatalogItem>,
) -> Option<(usize, LoadProgress)> {
    let mut state = write_state(state);
    if state.generation != generation {
        return None;
    }
    let merged = state.merge(items);
    Some((merged, state.progress))
}

fn finish_session(state: &RwLock<LoaderState>, event_bus: &EventBus, generation: u64) {
    let progress = {
        let mut state = write_state(state);
        if state.generation != generation {
            return;
        }
        state.is_loading = false;
        state.progress
    };

    log::info!(
        "Catalog load session {} finished: {}/{} items",
        generation,
        progress.loaded,
        progress.total
    );
    event_bus.emit(CatalogLoadCompleted::new(generation, progress.loaded, progress.total));
}

fn is_current(state: &RwLock<LoaderState>, generation: u64) -> bool {
    read_state(state).generation == generation
}

fn read_state(state: &RwLock<LoaderState>) -> RwLockReadGuard<'_, LoaderState> {
    state.read().unwrap_or_else(|e| e.into_inner())
}

fn write_state(state: &RwLock<LoaderState>) -> RwLockWriteGuard<'_, LoaderState> {
    state.write().unwrap_or_else(|e| e.into_inner())
}
