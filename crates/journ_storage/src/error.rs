//! Error types for device operations.

use std::io;
use thiserror::Error;

/// Result type for device operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while operating on a backing device.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing object could not be created, opened, or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The platform does not provide the requested capability.
    #[error("unsupported on this platform: {0}")]
    Unsupported(&'static str),
}
