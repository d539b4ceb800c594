// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - The boundary between a UI and the services
// - It never modifies domain or service code
// - It translates between DTOs and domain entities

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod formatters;
pub mod state;

pub use dto::*;
pub use commands::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use formatters::{capitalize, format_height, format_pokemon_id, format_weight};
pub use state::{open_store, AppState};
