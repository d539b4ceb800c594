// src/application/commands/catalog_commands.rs
//
// Catalog Command Handlers
//
// RULES:
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::dto::*;
use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::state::AppState;
use crate::domain::FilterState;
use crate::services::filter_service;

/// Start a new load session and return its first page
pub async fn load_catalog(state: &AppState) -> Result<CatalogPageDto, String> {
    state
        .catalog_loader
        .load_catalog()
        .await
        .to_error_response()?;

    Ok(get_catalog_page(state, &FilterState::default()))
}

/// Current catalog through the given filters
pub fn get_catalog_page(state: &AppState, filter: &FilterState) -> CatalogPageDto {
    let snapshot = state.catalog_loader.snapshot();
    let collection = &state.collection_service;

    let items = filter_service::apply_with_ownership(&snapshot.items, filter, |id| collection.is_owned(id))
        .iter()
        .map(|item| PokemonCardDto::from_item(item, collection.is_owned(item.id)))
        .collect();

    CatalogPageDto {
        items,
        total: snapshot.progress.total,
        loaded: snapshot.progress.loaded,
        is_loading: snapshot.is_loading,
        error: snapshot.error,
        active_filter_count: filter.active_filter_count(),
    }
}

/// Same as `get_catalog_page`, with filters from a shared link
pub fn get_catalog_page_from_query(state: &AppState, query: &str) -> CatalogPageDto {
    get_catalog_page(state, &FilterState::from_query_string(query))
}

pub async fn get_pokemon(state: &AppState, pokemon_id: u32) -> Result<PokemonDetailDto, String> {
    if pokemon_id == 0 {
        return Err(ErrorResponse::validation("Pokémon ids start at 1".to_string()).to_json());
    }

    let item = state
        .catalog_loader
        .fetch_one(pokemon_id)
        .await
        .to_error_response()?;
    let owned = state.collection_service.get(pokemon_id);

    Ok(PokemonDetailDto::from_item(&item, owned.as_ref()))
}

pub fn get_load_progress(state: &AppState) -> LoadProgressDto {
    LoadProgressDto::from(state.catalog_loader.progress())
}

pub fn cancel_catalog_load(state: &AppState) {
    state.catalog_loader.cancel();
}

/// Type tags for the filter menu
pub async fn list_types(state: &AppState) -> Result<Vec<String>, String> {
    state.catalog_loader.categories().await.to_error_response()
}
