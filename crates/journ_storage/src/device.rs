//! Block device trait definition.

use crate::error::StorageResult;

/// A seekable, uncached, write-only backing object for block I/O.
///
/// Devices are **opaque byte sinks**. They maintain a single write position
/// and support the handful of motions a block-granular journal needs: write
/// at the current position, step the position backward, resize, rewind. They
/// do not understand blocks, records, or any journal format - the core owns
/// all of that.
///
/// # Invariants
///
/// - `write_all` transfers the whole slice or fails; on success the position
///   has advanced by exactly the slice length
/// - `seek_back(n)` moves the position `n` bytes toward the start
/// - `set_len` truncates or extends the object without moving the position;
///   callers that need offset 0 follow up with `rewind`
/// - writes are expected to bypass OS-level caching, subject only to
///   device-level caches outside this crate's control
///
/// # Implementors
///
/// - [`super::DirectFile`] - uncached file for real journals
/// - [`super::MemoryDevice`] - recording fake for tests
pub trait BlockDevice: Send {
    /// Returns the minimum I/O transfer granularity of the device, in bytes.
    fn sector_size(&self) -> StorageResult<u64>;

    /// Writes the entire buffer at the current position and advances the
    /// position by `buf.len()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails or completes partially.
    fn write_all(&mut self, buf: &[u8]) -> StorageResult<()>;

    /// Moves the write position `len` bytes backward.
    ///
    /// # Errors
    ///
    /// Returns an error if the seek fails, including seeking before offset 0.
    fn seek_back(&mut self, len: u64) -> StorageResult<()>;

    /// Truncates or extends the device to exactly `len` bytes.
    ///
    /// The write position is left untouched; use [`BlockDevice::rewind`] to
    /// return to the start.
    ///
    /// # Errors
    ///
    /// Returns an error if the resize fails.
    fn set_len(&mut self, len: u64) -> StorageResult<()>;

    /// Moves the write position back to offset 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the seek fails.
    fn rewind(&mut self) -> StorageResult<()>;

    /// Returns the current write position.
    ///
    /// # Errors
    ///
    /// Returns an error if the position cannot be determined.
    fn position(&mut self) -> StorageResult<u64>;
}
