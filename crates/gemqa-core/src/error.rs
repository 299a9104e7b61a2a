//! Unified error types for gemqa
//!
//! The per-turn variants render as the exact text shown to the user, so an
//! `Err` can be printed in place of an answer.

use thiserror::Error;

/// Unified error type for all gemqa operations
#[derive(Error, Debug)]
pub enum QaError {
    // Per-turn errors
    #[error("ERROR: API Key not found. Please set {env} in your .env file.")]
    MissingApiKey { env: String },

    #[error("HTTP Error: Could not connect to API. Status code: {status}. Response: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Connection Error: Failed to connect to the internet or API endpoint.")]
    Connection,

    #[error("Timeout Error: The request took too long to complete.")]
    Timeout,

    #[error("API Error: {0}")]
    Api(String),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),

    // Startup errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QaError {
    /// Whether a retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            QaError::Connection | QaError::Timeout => true,
            QaError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias using QaError
pub type Result<T> = std::result::Result<T, QaError>;
