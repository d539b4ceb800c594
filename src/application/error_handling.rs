// src/application/error_handling.rs
//
// Error Handling for Commands
//
// ARCHITECTURE:
// - Maps internal errors → user-friendly responses
// - Provides consistent error format for UI
// - Never exposes internal implementation details
// - Logs errors for debugging
// - Flags errors the UI should offer to retry

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response for UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
    /// Whether a retry affordance should be shown
    pub retryable: bool,
}

/// Error categories for UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found (404)
    NotFound,

    /// Invalid input/validation error (400)
    Validation,

    /// Domain invariant violation (422)
    DomainError,

    /// Database/persistence error (500)
    Database,

    /// Remote catalog error (502)
    ExternalService,

    /// The catalog could not be loaded at all
    CatalogUnavailable,

    /// A newer load replaced the one this request was waiting on
    Cancelled,

    /// Saving the export file failed
    Export,

    /// File system error (500)
    FileSystem,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>, retryable: bool) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
            retryable,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        let retryable = error.is_retryable();

        match error {
            AppError::NotFound => Self::new(ErrorType::NotFound, "Resource not found", None, false),

            AppError::Domain(domain_error) => Self::new(
                ErrorType::DomainError,
                "Domain validation failed",
                Some(domain_error.to_string()),
                false,
            ),

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                    false,
                )
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);
                Self::new(ErrorType::Database, "Database connection failed", None, retryable)
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self::new(ErrorType::Internal, "Data serialization failed", None, false)
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::FileSystem,
                    "File system operation failed",
                    Some(io_error.to_string()),
                    false,
                )
            }

            AppError::Http { status, message } => {
                let details = match status {
                    Some(code) => format!("HTTP {}: {}", code, message),
                    None => message,
                };
                if status == Some(404) {
                    Self::new(ErrorType::NotFound, "Pokémon not found", Some(details), false)
                } else {
                    Self::new(ErrorType::ExternalService, "Remote catalog error", Some(details), retryable)
                }
            }

            AppError::IndexFetch(reason) => Self::new(
                ErrorType::CatalogUnavailable,
                "Failed to load the Pokédex",
                Some(reason),
                retryable,
            ),

            AppError::InitialBatchFailed { attempted } => Self::new(
                ErrorType::CatalogUnavailable,
                "Failed to load any Pokémon",
                Some(format!("All {} requests of the first page failed", attempted)),
                retryable,
            ),

            AppError::LoadCancelled { generation } => Self::new(
                ErrorType::Cancelled,
                "Loading was restarted",
                Some(format!("Session {} superseded", generation)),
                false,
            ),

            AppError::Export(reason) => Self::new(
                ErrorType::Export,
                "Could not save the export file",
                Some(reason),
                retryable,
            ),

            AppError::Other(message) => {
                log::error!("Other error: {}", message);
                Self::new(ErrorType::Internal, message, None, false)
            }
        }
    }

    /// Create validation error
    pub fn validation(message: String) -> Self {
        Self::new(ErrorType::Validation, message, None, false)
    }

    /// Create not found error
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorType::NotFound, format!("{} not found", resource), None, false)
    }

    /// JSON form handed across the UI boundary
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "Internal error".to_string())
    }
}

/// Helper trait to convert Results to ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, String>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, String> {
        self.map_err(|e| ErrorResponse::from_app_error(e).to_json())
    }
}
