//! Common error types for the catalog service

use thiserror::Error;

/// Common result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the catalog crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or a record that violates storage constraints
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Custom identifier already taken at write time
    ///
    /// Raised when the UNIQUE constraint on `custom_id` rejects an insert.
    /// Generated identifiers are retried with a fresh sequence; supplied
    /// identifiers are reported back to the caller.
    #[error("Custom identifier already in use: {0}")]
    IdentifierConflict(String),

    /// Per-domain sequence no longer fits in three digits
    #[error("Identifier sequence exhausted for domain '{domain}'")]
    SequenceExhausted { domain: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when a retry with a freshly allocated identifier may succeed
    pub fn is_identifier_conflict(&self) -> bool {
        matches!(self, Error::IdentifierConflict(_))
    }
}
