//! Key-value store error types.

use thiserror::Error;

/// Errors that can occur when talking to a key-value store.
#[derive(Error, Debug)]
pub enum KvError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be used with this backend.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Backend-specific failure.
    #[error("Store operation failed: {0}")]
    Backend(String),
}

/// Result type for key-value operations.
pub type KvResult<T> = Result<T, KvError>;
