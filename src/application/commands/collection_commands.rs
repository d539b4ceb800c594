// src/application/commands/collection_commands.rs
//
// Collection Command Handlers

use std::path::Path;

use crate::application::dto::*;
use crate::application::error_handling::ToErrorResponse;
use crate::application::state::AppState;
use crate::domain::{CollectionStatistics, FilterState};
use crate::services::{filter_service, to_delimited_text};

/// Capture a Pokémon by id; returns false if it was already owned
pub async fn capture_pokemon(state: &AppState, dto: CaptureDto) -> Result<bool, String> {
    let item = state
        .catalog_loader
        .fetch_one(dto.pokemon_id)
        .await
        .to_error_response()?;

    Ok(state.collection_service.capture(&item, dto.note))
}

/// Returns the new ownership state
pub async fn toggle_caught(state: &AppState, pokemon_id: u32) -> Result<bool, String> {
    if state.collection_service.is_owned(pokemon_id) {
        state.collection_service.release(pokemon_id);
        return Ok(false);
    }

    let item = state
        .catalog_loader
        .fetch_one(pokemon_id)
        .await
        .to_error_response()?;
    Ok(state.collection_service.toggle(&item))
}

pub fn release_pokemon(state: &AppState, pokemon_id: u32) -> bool {
    state.collection_service.release(pokemon_id)
}

pub fn annotate_pokemon(state: &AppState, pokemon_id: u32, note: Option<String>) -> bool {
    let note = note.filter(|n| !n.trim().is_empty());
    state.collection_service.annotate(pokemon_id, note)
}

pub fn list_collection(state: &AppState, filter: &FilterState) -> Vec<OwnedPokemonDto> {
    filter_service::apply_owned(&state.collection_service.records(), filter)
        .into_iter()
        .map(OwnedPokemonDto::from)
        .collect()
}

// ============================================================================
// SELECTION
// ============================================================================

/// Returns whether the id is selected afterwards
pub fn toggle_selection(state: &AppState, pokemon_id: u32) -> bool {
    state
        .selection
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .toggle(pokemon_id)
}

/// Select every visible record, or clear if they already are all selected
pub fn toggle_select_all(state: &AppState, visible: &[u32]) {
    let mut selection = state.selection.lock().unwrap_or_else(|e| e.into_inner());
    if selection.is_all_selected(visible) {
        selection.clear();
    } else {
        selection.select_all(visible.iter().copied());
    }
}

pub fn selected_count(state: &AppState) -> usize {
    state
        .selection
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .count()
}

/// Release every selected record in one write
pub fn release_selected(state: &AppState) -> usize {
    let mut selection = state.selection.lock().unwrap_or_else(|e| e.into_inner());
    state.collection_service.release_selection(&mut selection)
}

// ============================================================================
// ANALYTICS AND EXPORT
// ============================================================================

pub fn get_collection_statistics(state: &AppState) -> CollectionStatistics {
    state.statistics_service.current()
}

pub fn get_type_breakdown(state: &AppState) -> Vec<TypeCountDto> {
    state
        .collection_service
        .type_breakdown()
        .into_iter()
        .map(|(tag, count)| TypeCountDto { tag, count })
        .collect()
}

pub fn get_export_text(state: &AppState) -> String {
    to_delimited_text(&state.collection_service.records())
}

/// Save the export into `dir`; returns the written path
pub fn export_collection(state: &AppState, dir: &Path) -> Result<String, String> {
    let records = state.collection_service.records();
    let path = state
        .export_service
        .save_to_file(&records, dir)
        .to_error_response()?;

    Ok(path.display().to_string())
}
