//! Error types for journal operations.

use thiserror::Error;

/// Result type for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;

/// Errors that can occur in the journal write path.
///
/// All errors surface at the offending call; nothing is retried or
/// downgraded. A failed physical write leaves the in-memory buffer state
/// as-is, and the caller decides whether to abort or reopen the store.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Ring buffer constructed with a capacity of zero.
    #[error("invalid ring buffer capacity: {capacity}")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },

    /// Ring buffer position set outside `[0, capacity)`.
    #[error("position {position} out of range for capacity {capacity}")]
    PositionOutOfRange {
        /// The rejected position.
        position: usize,
        /// The buffer capacity.
        capacity: usize,
    },

    /// Block store opened with an empty path.
    #[error("journal path is empty")]
    InvalidPath,

    /// Block size is zero or not a multiple of the device sector size.
    #[error("invalid block size {block_size}: must be a positive multiple of the sector size ({sector_size} bytes)")]
    InvalidBlockSize {
        /// The rejected block size.
        block_size: usize,
        /// The sector size reported for the target device.
        sector_size: u64,
    },

    /// A block handed to the store does not match its configured block size.
    #[error("block is {actual} bytes, store writes blocks of {expected}")]
    BlockLengthMismatch {
        /// Length of the block that was passed in.
        actual: usize,
        /// The store's configured block size.
        expected: usize,
    },

    /// The backing device failed.
    #[error("storage error: {0}")]
    Storage(#[from] journ_storage::StorageError),
}
