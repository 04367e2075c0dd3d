//! Common error types for the goshawk pipeline tools

use thiserror::Error;

/// Common result type for goshawk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the goshawk tools
///
/// Per-item failures (`NotFound`, `IntegrityMismatch`, `AmbiguousPath`) are
/// caught and counted by batch loops; only structural failures abort a run.
#[derive(Error, Debug)]
pub enum Error {
    /// Catalog could not be reached; planning falls back to the full workflow
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Expected artifact or sidecar is missing (reported per item)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Copy verification failed; the source artifact is preserved
    #[error("Integrity mismatch: {0}")]
    IntegrityMismatch(String),

    /// A subswath could not be inferred from a storage path
    #[error("Ambiguous path: {0}")]
    AmbiguousPath(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
