// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A single remote call failed (non-success status or transport error)
    #[error("Remote catalog error: {message}")]
    Http {
        status: Option<u16>,
        message: String,
    },

    /// The catalog index could not be fetched; the load session is over
    #[error("Failed to fetch catalog index: {0}")]
    IndexFetch(String),

    /// Every item of the first batch failed; nothing would be shown
    #[error("Initial batch failed: none of {attempted} items could be fetched")]
    InitialBatchFailed { attempted: usize },

    /// The awaited load session was superseded or cancelled
    #[error("Load session {generation} was cancelled")]
    LoadCancelled { generation: u64 },

    /// Writing an export file failed; the caller may retry
    #[error("Export failed: {0}")]
    Export(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// Whether retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Http { .. }
                | AppError::IndexFetch(_)
                | AppError::InitialBatchFailed { .. }
                | AppError::Export(_)
                | AppError::Pool(_)
        )
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Http {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
