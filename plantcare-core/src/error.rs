//! Error types for plantcare-core

use thiserror::Error;

/// Main error type for the plantcare-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Watering interval below one day, or a negative streak tolerance
    #[error("invalid interval: {days} days")]
    InvalidInterval { days: i64 },

    /// Malformed or unrepresentable date input
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Plant not found
    #[error("plant not found: {0}")]
    PlantNotFound(String),

    /// A plant query matched more than one plant
    #[error("'{query}' matches {count} plants; use a more specific name or the plant id")]
    AmbiguousPlant { query: String, count: usize },
}

/// Result type alias for plantcare-core
pub type Result<T> = std::result::Result<T, Error>;
