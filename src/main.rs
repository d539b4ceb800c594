// src/main.rs
//
// Command-line front end: loads the catalog, reports on the local
// collection and optionally exports it.
//
// Usage: pokedex [EXPORT_DIR]

use std::path::PathBuf;

use anyhow::Context;

use pokedex::application::commands::{export_collection, get_collection_statistics, load_catalog};
use pokedex::application::format_pokemon_id;
use pokedex::events::{CatalogBatchMerged, CatalogBatchSkipped, CatalogLoadCompleted};
use pokedex::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize env_logger to output to stderr (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // 1. CONFIGURATION
    let config = AppConfig::from_env();
    let export_dir = std::env::args().nth(1).map(PathBuf::from);

    // 2. APPLICATION STATE
    let state = AppState::initialize(config).context("failed to initialise the application")?;

    // 3. PROGRESS REPORTING
    state.event_bus.subscribe::<CatalogBatchMerged, _>(|event| {
        log::info!("Loaded {}/{} Pokémon", event.loaded, event.total);
    });
    state.event_bus.subscribe::<CatalogBatchSkipped, _>(|event| {
        log::warn!("Skipped batch {} ({} Pokémon unavailable)", event.batch_index, event.attempted);
    });
    state.event_bus.subscribe::<CatalogLoadCompleted, _>(|event| {
        log::info!("Catalog ready: {} of {} Pokémon", event.loaded, event.total);
    });

    // 4. CATALOG
    let first_page = load_catalog(&state)
        .await
        .map_err(anyhow::Error::msg)
        .context("failed to load the catalog")?;
    log::info!("First page ready with {} Pokémon", first_page.items.len());
    state.catalog_loader.wait_for_background().await;

    // 5. COLLECTION REPORT
    let stats = get_collection_statistics(&state);
    println!(
        "Caught {} of {} ({:.1}%)",
        stats.total_caught, stats.total_available, stats.completion_percentage
    );
    println!(
        "Most common type: {} ({})",
        stats.most_common_type.tag, stats.most_common_type.count
    );
    if let Some(heaviest) = &stats.heaviest {
        println!("Heaviest: {} {}", format_pokemon_id(heaviest.id), heaviest.name);
    }
    if let Some(tallest) = &stats.tallest {
        println!("Tallest: {} {}", format_pokemon_id(tallest.id), tallest.name);
    }
    println!(
        "Average attack/defense/speed: {}/{}/{}",
        stats.avg_attack, stats.avg_defense, stats.avg_speed
    );

    // 6. EXPORT
    if let Some(dir) = export_dir {
        let path = export_collection(&state, &dir)
            .map_err(anyhow::Error::msg)
            .context("failed to export the collection")?;
        println!("Exported collection to {}", path);
    }

    state.shutdown();
    Ok(())
}
