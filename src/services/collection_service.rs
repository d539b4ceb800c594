// src/services/collection_service.rs
//
// Collection Service - the user's captured Pokémon
//
// CRITICAL RULES:
// - At most one record per id; duplicate capture is a silent no-op
// - Release/annotate of an absent id is a silent no-op
// - Every mutation is persisted before the call returns
// - Persistence failures are logged, never surfaced
// - Unreadable stored data falls back to an empty collection

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{CatalogItem, OwnedRecord, Selection, TagCounts};
use crate::error::AppResult;
use crate::events::{EventBus, PokemonCaptured, PokemonNoteUpdated, PokemonReleased};
use crate::repositories::KeyValueStore;

/// Key under which the whole collection is stored
pub const STORAGE_KEY: &str = "pokedex-storage";

const STORAGE_VERSION: u32 = 0;

/// Stored layout: `{"state":{"caught":[...]},"version":0}`
#[derive(Debug, Serialize, Deserialize)]
struct PersistedCollection {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    caught: Vec<OwnedRecord>,
}

pub struct CollectionService {
    store: Arc<dyn KeyValueStore>,
    event_bus: Arc<EventBus>,
    records: RwLock<Vec<OwnedRecord>>,
}

impl CollectionService {
    /// Rehydrate the collection from the store
    pub fn initialize(store: Arc<dyn KeyValueStore>, event_bus: Arc<EventBus>) -> Self {
        let records = load_records(store.as_ref());
        log::info!("Collection loaded with {} records", records.len());

        Self {
            store,
            event_bus,
            records: RwLock::new(records),
        }
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Snapshot `item` into the collection.
    ///
    /// Returns false if the id was already owned; the existing record,
    /// note included, is left untouched.
    pub fn capture(&self, item: &CatalogItem, note: Option<String>) -> bool {
        let record = OwnedRecord::capture(item, note);
        {
            let mut records = self.write();
            if records.iter().any(|r| r.id == record.id) {
                log::debug!("{} already captured", item);
                return false;
            }
            records.push(record);
            self.persist_logged(&records);
        }

        self.event_bus
            .emit(PokemonCaptured::new(item.id, item.name.clone()));
        true
    }

    pub fn release(&self, id: u32) -> bool {
        self.release_many([id]) == 1
    }

    /// Remove every listed id with a single write; returns how many were removed
    pub fn release_many<I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = u32>,
    {
        let wanted: HashSet<u32> = ids.into_iter().collect();
        let released: Vec<u32> = {
            let mut records = self.write();
            let released: Vec<u32> = records
                .iter()
                .filter(|r| wanted.contains(&r.id))
                .map(|r| r.id)
                .collect();

            if released.is_empty() {
                return 0;
            }

            records.retain(|r| !wanted.contains(&r.id));
            self.persist_logged(&records);
            released
        };

        let count = released.len();
        self.event_bus.emit(PokemonReleased::new(released));
        count
    }

    /// Release everything selected and clear the selection
    pub fn release_selection(&self, selection: &mut Selection) -> usize {
        let released = self.release_many(selection.ids());
        selection.clear();
        released
    }

    /// Replace the note of an owned record; returns false if not owned
    pub fn annotate(&self, id: u32, note: Option<String>) -> bool {
        {
            let mut records = self.write();
            let Some(record) = records.iter_mut().find(|r| r.id == id) else {
                return false;
            };
            record.note = note;
            self.persist_logged(&records);
        }

        self.event_bus.emit(PokemonNoteUpdated::new(id));
        true
    }

    /// Capture if not owned, release if owned; returns the new ownership
    pub fn toggle(&self, item: &CatalogItem) -> bool {
        if self.is_owned(item.id) {
            self.release(item.id);
            false
        } else {
            self.capture(item, None);
            true
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn is_owned(&self, id: u32) -> bool {
        self.read().iter().any(|r| r.id == id)
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    pub fn get(&self, id: u32) -> Option<OwnedRecord> {
        self.read().iter().find(|r| r.id == id).cloned()
    }

    /// All records in capture order
    pub fn records(&self) -> Vec<OwnedRecord> {
        self.read().clone()
    }

    /// Records per tag; a record counts towards each of its tags
    pub fn count_by_tag(&self) -> TagCounts {
        TagCounts::from_records(self.read().iter())
    }

    /// Tag counts, most common first
    pub fn type_breakdown(&self) -> Vec<(String, usize)> {
        self.count_by_tag().by_count_desc()
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Write the current collection, reporting failure
    pub fn flush(&self) -> AppResult<()> {
        let records = self.read();
        persist(self.store.as_ref(), &records)
    }

    pub fn shutdown(&self) {
        match self.flush() {
            Ok(()) => log::info!("Collection flushed on shutdown"),
            Err(e) => log::error!("Failed to flush collection on shutdown: {}", e),
        }
    }

    fn persist_logged(&self, records: &[OwnedRecord]) {
        if let Err(e) = persist(self.store.as_ref(), records) {
            log::error!("Failed to persist collection ({} records): {}", records.len(), e);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<OwnedRecord>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<OwnedRecord>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn persist(store: &dyn KeyValueStore, records: &[OwnedRecord]) -> AppResult<()> {
    let payload = PersistedCollection {
        state: PersistedState {
            caught: records.to_vec(),
        },
        version: STORAGE_VERSION,
    };
    let json = serde_json::to_string(&payload)?;
    store.set(STORAGE_KEY, &json)
}

fn load_records(store: &dyn KeyValueStore) -> Vec<OwnedRecord> {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::error!("Failed to read stored collection, starting empty: {}", e);
            return Vec::new();
        }
    };

    let persisted: PersistedCollection = match serde_json::from_str(&raw) {
        Ok(persisted) => persisted,
        Err(e) => {
            log::warn!("Stored collection is unreadable, starting empty: {}", e);
            return Vec::new();
        }
    };

    if persisted.version != STORAGE_VERSION {
        log::warn!("Stored collection has version {}, reading as {}", persisted.version, STORAGE_VERSION);
    }

    // first occurrence wins
    let mut seen = HashSet::new();
    persisted
        .state
        .caught
        .into_iter()
        .filter(|r| seen.insert(r.id))
        .collect()
}
