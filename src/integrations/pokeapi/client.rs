// src/integrations/pokeapi/client.rs
//
// PokeAPI Integration
//
// ARCHITECTURE:
// - REST client for https://pokeapi.co
// - Decodes responses into private wire structs
// - Validates and maps them into catalog items (NO collection mutation)
// - Used by the catalog loader through the CatalogClient trait
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Malformed remote data is rejected here, before it reaches the catalog
// - Every request carries a deadline

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::{validate_catalog_item, BaseStat, CatalogIndex, CatalogItem, IndexEntry};
use crate::error::{AppError, AppResult};
use crate::integrations::CatalogClient;

/// Paginated list response (`/pokemon`, `/type`)
#[derive(Debug, Deserialize)]
struct ListResponse {
    count: usize,
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
    #[serde(default)]
    url: String,
}

/// Pokémon detail response (`/pokemon/{id}`)
#[derive(Debug, Deserialize)]
struct PokemonData {
    id: u32,
    name: String,
    types: Vec<TypeSlotData>,
    sprites: SpritesData,
    height: u32,
    weight: u32,
    stats: Vec<StatData>,
    base_experience: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TypeSlotData {
    slot: u32,
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct SpritesData {
    front_default: Option<String>,
    other: Option<OtherSpritesData>,
}

#[derive(Debug, Deserialize)]
struct OtherSpritesData {
    #[serde(rename = "official-artwork")]
    official_artwork: Option<ArtworkData>,
}

#[derive(Debug, Deserialize)]
struct ArtworkData {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatData {
    base_stat: u32,
    stat: NamedResource,
}

/// PokeAPI Client
pub struct PokeApiClient {
    base_url: String,
    http_client: Client,
}

impl PokeApiClient {
    /// Create a client for `base_url` (e.g. `https://pokeapi.co/api/v2`)
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Fetch a Pokémon by name; names are matched lower-case
    pub async fn fetch_detail_by_name(&self, name: &str) -> AppResult<CatalogItem> {
        let url = format!("{}/pokemon/{}", self.base_url, name.trim().to_lowercase());
        let data: PokemonData = self.get_json(&url).await?;
        Self::map_pokemon(data)
    }

    // ========================================================================
    // INTERNAL: HTTP
    // ========================================================================

    async fn get_json<T>(&self, url: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AppError::Http {
                status: None,
                message: format!("PokeAPI request to {} failed: {}", url, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Http {
                status: Some(status.as_u16()),
                message: format!("PokeAPI returned status {} for {}", status, url),
            });
        }

        response.json::<T>().await.map_err(|e| AppError::Http {
            status: Some(status.as_u16()),
            message: format!("Failed to parse PokeAPI response from {}: {}", url, e),
        })
    }

    // ========================================================================
    // INTERNAL: Mapping
    // ========================================================================

    fn map_index(list: ListResponse) -> CatalogIndex {
        CatalogIndex {
            total_count: list.count,
            entries: list
                .results
                .into_iter()
                .map(|r| IndexEntry::new(r.name, r.url))
                .collect(),
        }
    }

    /// Map and validate a detail record
    fn map_pokemon(data: PokemonData) -> AppResult<CatalogItem> {
        let mut slots = data.types;
        slots.sort_by_key(|t| t.slot);

        // Official artwork when present, otherwise the default sprite
        let image = data
            .sprites
            .other
            .and_then(|o| o.official_artwork)
            .and_then(|a| a.front_default)
            .filter(|url| !url.is_empty())
            .or(data.sprites.front_default)
            .unwrap_or_default();

        let item = CatalogItem {
            id: data.id,
            name: data.name,
            types: slots.into_iter().map(|t| t.kind.name).collect(),
            height: data.height,
            weight: data.weight,
            stats: data
                .stats
                .into_iter()
                .map(|s| BaseStat::new(s.stat.name, s.base_stat))
                .collect(),
            image,
            base_experience: data.base_experience,
        };

        validate_catalog_item(&item)?;
        Ok(item)
    }
}

#[async_trait]
impl CatalogClient for PokeApiClient {
    async fn list_index(&self, limit: u32) -> AppResult<CatalogIndex> {
        let url = format!("{}/pokemon?limit={}", self.base_url, limit);
        let list: ListResponse = self.get_json(&url).await?;
        Ok(Self::map_index(list))
    }

    async fn fetch_detail_by_ref(&self, detail_ref: &str) -> AppResult<CatalogItem> {
        let data: PokemonData = self.get_json(detail_ref).await?;
        Self::map_pokemon(data)
    }

    async fn fetch_detail_by_id(&self, id: u32) -> AppResult<CatalogItem> {
        let url = format!("{}/pokemon/{}", self.base_url, id);
        let data: PokemonData = self.get_json(&url).await?;
        Self::map_pokemon(data)
    }

    async fn list_categories(&self) -> AppResult<Vec<String>> {
        let url = format!("{}/type", self.base_url);
        let list: ListResponse = self.get_json(&url).await?;
        Ok(list.results.into_iter().map(|r| r.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHARIZARD: &str = r#"{
        "id": 6,
        "name": "charizard",
        "base_experience": 267,
        "height": 17,
        "weight": 905,
        "types": [
            { "slot": 2, "type": { "name": "flying", "url": "https://pokeapi.co/api/v2/type/3/" } },
            { "slot": 1, "type": { "name": "fire", "url": "https://pokeapi.co/api/v2/type/10/" } }
        ],
        "sprites": {
            "front_default": "https://img.example/sprites/6.png",
            "other": { "official-artwork": { "front_default": "https://img.example/artwork/6.png" } }
        },
        "stats": [
            { "base_stat": 78, "effort": 0, "stat": { "name": "hp", "url": "" } },
            { "base_stat": 84, "effort": 0, "stat": { "name": "attack", "url": "" } },
            { "base_stat": 100, "effort": 3, "stat": { "name": "speed", "url": "" } }
        ]
    }"#;

    #[test]
    fn test_client_creation() {
        let client = PokeApiClient::new("https://pokeapi.co/api/v2/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "https://pokeapi.co/api/v2");
    }

    #[test]
    fn test_map_pokemon_orders_types_by_slot() {
        let data: PokemonData = serde_json::from_str(CHARIZARD).unwrap();
        let item = PokeApiClient::map_pokemon(data).unwrap();

        assert_eq!(item.id, 6);
        assert_eq!(item.types, vec!["fire".to_string(), "flying".to_string()]);
        assert_eq!(item.image, "https://img.example/artwork/6.png");
        assert_eq!(item.stat("speed"), Some(100));
        assert_eq!(item.base_experience, Some(267));
    }

    #[test]
    fn test_map_pokemon_falls_back_to_default_sprite() {
        let json = CHARIZARD.replace(
            r#""other": { "official-artwork": { "front_default": "https://img.example/artwork/6.png" } }"#,
            r#""other": null"#,
        );
        let data: PokemonData = serde_json::from_str(&json).unwrap();
        let item = PokeApiClient::map_pokemon(data).unwrap();
        assert_eq!(item.image, "https://img.example/sprites/6.png");
    }

    #[test]
    fn test_map_pokemon_rejects_typeless_record() {
        let json = r#"{
            "id": 10, "name": "caterpie", "height": 3, "weight": 29,
            "types": [], "sprites": { "front_default": null }, "stats": []
        }"#;
        let data: PokemonData = serde_json::from_str(json).unwrap();
        assert!(matches!(PokeApiClient::map_pokemon(data), Err(AppError::Domain(_))));
    }

    #[test]
    fn test_map_index() {
        let json = r#"{
            "count": 1302, "next": null, "previous": null,
            "results": [
                { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" },
                { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/" }
            ]
        }"#;
        let list: ListResponse = serde_json::from_str(json).unwrap();
        let index = PokeApiClient::map_index(list);
        assert_eq!(index.total_count, 1302);
        assert_eq!(index.entries[1].detail_ref, "https://pokeapi.co/api/v2/pokemon/2/");
    }
}
