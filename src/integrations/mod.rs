// src/integrations/mod.rs
//
// External Integrations Module

pub mod catalog_client;
pub mod pokeapi;

pub use catalog_client::CatalogClient;
pub use pokeapi::PokeApiClient;

#[cfg(test)]
pub use catalog_client::MockCatalogClient;
