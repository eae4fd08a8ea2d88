//! Error types for notekeeper-core

use thiserror::Error;

/// Result type alias using notekeeper-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the store and the session persistence layer
#[derive(Error, Debug)]
pub enum Error {
    /// Persistent session storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
