//! Record store error types.

use thiserror::Error;

/// Record store error type.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Insert collided with an existing primary key
    #[error("Card already exists: {0}")]
    DuplicateKey(String),

    /// Update target does not exist
    #[error("Card not found: {0}")]
    NotFound(String),

    /// Record rejected before reaching SQLite
    #[error("Invalid card: {0}")]
    InvalidRecord(String),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Executor connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using StoreError.
pub type StoreResult<T> = Result<T, StoreError>;
