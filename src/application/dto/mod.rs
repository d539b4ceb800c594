// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs NEVER leak domain invariants
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)

use serde::{Deserialize, Serialize};

use crate::application::formatters::{capitalize, format_height, format_pokemon_id, format_weight};
use crate::domain::{CatalogItem, OwnedRecord};
use crate::services::{CatalogSnapshot, LoadProgress};

// ============================================================================
// CATALOG DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonCardDto {
    pub id: u32,
    pub display_id: String,
    pub name: String,
    pub types: Vec<String>,
    pub height: String,
    pub weight: String,
    pub image: String,
    pub caught: bool,
}

impl PokemonCardDto {
    pub fn from_item(item: &CatalogItem, caught: bool) -> Self {
        Self {
            id: item.id,
            display_id: format_pokemon_id(item.id),
            name: capitalize(&item.name),
            types: item.types.clone(),
            height: format_height(item.height),
            weight: format_weight(item.weight),
            image: item.image.clone(),
            caught,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonDetailDto {
    #[serde(flatten)]
    pub card: PokemonCardDto,
    pub base_experience: Option<u32>,
    pub stats: Vec<StatDto>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatDto {
    pub name: String,
    pub value: u32,
}

impl PokemonDetailDto {
    pub fn from_item(item: &CatalogItem, owned: Option<&OwnedRecord>) -> Self {
        Self {
            card: PokemonCardDto::from_item(item, owned.is_some()),
            base_experience: item.base_experience,
            stats: item
                .stats
                .iter()
                .map(|s| StatDto {
                    name: s.name.clone(),
                    value: s.value,
                })
                .collect(),
            note: owned.and_then(|r| r.note.clone()),
        }
    }
}

/// One filtered view of the catalog plus the load state behind it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPageDto {
    pub items: Vec<PokemonCardDto>,
    pub total: usize,
    pub loaded: usize,
    pub is_loading: bool,
    pub error: Option<String>,
    pub active_filter_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoadProgressDto {
    pub total: usize,
    pub loaded: usize,
    pub percent: f64,
    pub complete: bool,
}

impl From<LoadProgress> for LoadProgressDto {
    fn from(progress: LoadProgress) -> Self {
        Self {
            total: progress.total,
            loaded: progress.loaded,
            percent: progress.percent(),
            complete: progress.is_complete(),
        }
    }
}

impl From<&CatalogSnapshot> for LoadProgressDto {
    fn from(snapshot: &CatalogSnapshot) -> Self {
        Self::from(snapshot.progress)
    }
}

// ============================================================================
// COLLECTION DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedPokemonDto {
    pub id: u32,
    pub display_id: String,
    pub name: String,
    pub types: Vec<String>,
    pub height: String,
    pub weight: String,
    pub image: String,
    pub caught_at: String,
    pub note: Option<String>,
}

impl From<OwnedRecord> for OwnedPokemonDto {
    fn from(record: OwnedRecord) -> Self {
        Self {
            id: record.id,
            display_id: format_pokemon_id(record.id),
            name: capitalize(&record.name),
            height: format_height(record.height),
            weight: format_weight(record.weight),
            types: record.types,
            image: record.image,
            caught_at: record.caught_at,
            note: record.note,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureDto {
    pub pokemon_id: u32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCountDto {
    #[serde(rename = "type")]
    pub tag: String,
    pub count: usize,
}
