// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// CATALOG LOADING EVENTS
// ============================================================================

/// Emitted when a load session begins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogLoadStarted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub generation: u64,
    pub total: usize,
}

impl CatalogLoadStarted {
    pub fn new(generation: u64, total: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            generation,
            total,
        }
    }
}

impl DomainEvent for CatalogLoadStarted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CatalogLoadStarted" }
}

/// Emitted after a batch's fetched items were merged into the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogBatchMerged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub generation: u64,
    pub batch_index: usize,
    pub merged: usize,
    pub failed: usize,
    pub loaded: usize,
    pub total: usize,
}

impl CatalogBatchMerged {
    pub fn new(
        generation: u64,
        batch_index: usize,
        merged: usize,
        failed: usize,
        loaded: usize,
        total: usize,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            generation,
            batch_index,
            merged,
            failed,
            loaded,
            total,
        }
    }
}

impl DomainEvent for CatalogBatchMerged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CatalogBatchMerged" }
}

/// Emitted when every item of a background batch failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogBatchSkipped {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub generation: u64,
    pub batch_index: usize,
    pub attempted: usize,
}

impl CatalogBatchSkipped {
    pub fn new(generation: u64, batch_index: usize, attempted: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            generation,
            batch_index,
            attempted,
        }
    }
}

impl DomainEvent for CatalogBatchSkipped {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CatalogBatchSkipped" }
}

/// Emitted when a session has worked through every batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogLoadCompleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub generation: u64,
    pub loaded: usize,
    pub total: usize,
}

impl CatalogLoadCompleted {
    pub fn new(generation: u64, loaded: usize, total: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            generation,
            loaded,
            total,
        }
    }
}

impl DomainEvent for CatalogLoadCompleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CatalogLoadCompleted" }
}

/// Emitted when a session ends with a terminal error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogLoadFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub generation: u64,
    pub reason: String,
}

impl CatalogLoadFailed {
    pub fn new(generation: u64, reason: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            generation,
            reason,
        }
    }
}

impl DomainEvent for CatalogLoadFailed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CatalogLoadFailed" }
}

// ============================================================================
// COLLECTION EVENTS
// ============================================================================

/// Emitted when a Pokémon enters the collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonCaptured {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub pokemon_id: u32,
    pub name: String,
}

impl PokemonCaptured {
    pub fn new(pokemon_id: u32, name: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            pokemon_id,
            name,
        }
    }
}

impl DomainEvent for PokemonCaptured {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "PokemonCaptured" }
}

/// Emitted when one or more Pokémon leave the collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonReleased {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub pokemon_ids: Vec<u32>,
}

impl PokemonReleased {
    pub fn new(pokemon_ids: Vec<u32>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            pokemon_ids,
        }
    }
}

impl DomainEvent for PokemonReleased {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "PokemonReleased" }
}

/// Emitted when a captured Pokémon's note changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonNoteUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub pokemon_id: u32,
}

impl PokemonNoteUpdated {
    pub fn new(pokemon_id: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            pokemon_id,
        }
    }
}

impl DomainEvent for PokemonNoteUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "PokemonNoteUpdated" }
}

/// Emitted after the collection was written to an export file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionExported {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub path: String,
    pub record_count: usize,
}

impl CollectionExported {
    pub fn new(path: String, record_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            path,
            record_count,
        }
    }
}

impl DomainEvent for CollectionExported {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CollectionExported" }
}
