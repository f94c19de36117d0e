//! Error types for lackey_fetch

use thiserror::Error;

/// Unified error type for fetch, transform and write operations
#[derive(Debug, Error)]
pub enum LackeyError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Scryfall returned an error object
    #[error("{code}: {details}")]
    ApiResponse { code: String, details: String },
    /// HTTP error status code without a readable error body
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Tab-separated output could not be written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Search returned an empty result list
    #[error("No cards found for set: {0}")]
    NoCardsFound(String),
    /// Nothing to fetch
    #[error("No set codes defined")]
    NoSetCodes,
}

/// Short alias used throughout the crate
pub type Error = LackeyError;

/// Result alias for lackey_fetch operations
pub type Result<T> = std::result::Result<T, LackeyError>;
