// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - Explicit SQL only

pub mod key_value_repository;

pub use key_value_repository::{InMemoryKeyValueStore, KeyValueStore, SqliteKeyValueStore};
