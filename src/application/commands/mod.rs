// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between UI and Services
// - Commands accept DTOs, return DTOs
// - Commands turn AppError into serialized ErrorResponse
// - Commands NEVER contain business logic

pub mod catalog_commands;
pub mod collection_commands;

pub use catalog_commands::*;
pub use collection_commands::*;
