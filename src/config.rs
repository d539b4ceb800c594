// src/config.rs
//
// Application configuration
//
// PRINCIPLES:
// - Every value has a sensible default
// - Environment variables override defaults, nothing else does
// - Invalid overrides are logged and ignored, never fatal

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Number of Pokémon the catalog is capped at
pub const POKEDEX_MAX: usize = 1000;

pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub index_limit: u32,
    pub initial_batch_size: usize,
    pub batch_size: usize,
    /// Deadline for each individual network call
    pub request_timeout: Duration,
    /// Denominator of the completion percentage
    pub total_available: usize,
    /// `None` resolves to the platform data directory
    pub database_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            index_limit: POKEDEX_MAX as u32,
            initial_batch_size: 50,
            batch_size: 50,
            request_timeout: Duration::from_secs(30),
            total_available: POKEDEX_MAX,
            database_path: None,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with `POKEDEX_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("POKEDEX_API_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(limit) = parse_var(&lookup, "POKEDEX_INDEX_LIMIT") {
            config.index_limit = limit;
        }
        if let Some(size) = parse_var::<usize, _>(&lookup, "POKEDEX_INITIAL_BATCH_SIZE") {
            config.initial_batch_size = size.max(1);
        }
        if let Some(size) = parse_var::<usize, _>(&lookup, "POKEDEX_BATCH_SIZE") {
            config.batch_size = size.max(1);
        }
        if let Some(secs) = parse_var(&lookup, "POKEDEX_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(total) = parse_var(&lookup, "POKEDEX_TOTAL_AVAILABLE") {
            config.total_available = total;
        }
        if let Some(path) = lookup("POKEDEX_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        config
    }

    /// Resolve the SQLite file location, creating its directory.
    ///
    /// Default path structure: {APP_DATA}/pokedex/pokedex.db
    pub fn resolve_database_path(&self) -> AppResult<PathBuf> {
        let path = match &self.database_path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .ok_or_else(|| {
                    AppError::Other("Could not determine app data directory".to_string())
                })?
                .join("pokedex")
                .join("pokedex.db"),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.index_limit, 1000);
        assert_eq!(config.initial_batch_size, 50);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.total_available, 1000);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("POKEDEX_API_URL", "http://localhost:8080/api/"),
            ("POKEDEX_BATCH_SIZE", "20"),
            ("POKEDEX_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.api_base_url, "http://localhost:8080/api");
        assert_eq!(config.batch_size, 20);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_override_is_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("POKEDEX_INDEX_LIMIT", "lots"),
            ("POKEDEX_INITIAL_BATCH_SIZE", "0"),
        ]));
        assert_eq!(config.index_limit, 1000);
        assert_eq!(config.initial_batch_size, 1);
    }

    #[test]
    fn test_explicit_database_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_path: Some(dir.path().join("nested").join("pokedex.db")),
            ..AppConfig::default()
        };
        let path = config.resolve_database_path().unwrap();
        assert!(path.parent().unwrap().exists());
        assert!(path.ends_with("nested/pokedex.db"));
    }
}
