//! Journal writer: append API and flush/advance policy.

use crate::block::BlockStore;
use crate::config::JournalConfig;
use crate::error::JournalResult;
use crate::ring::RingBuffer;
use std::path::Path;
use tracing::debug;

/// Appends serialized values to a journal through a block-sized staging
/// buffer.
///
/// The writer owns one [`RingBuffer`] sized exactly to its [`BlockStore`]'s
/// block size. Bytes are serialized into the buffer one at a time; whenever
/// the buffer wraps, the completed block is committed with advance semantics
/// before any later byte lands, so the logical journal stream is the
/// concatenation of every advanced block in write order.
///
/// Each write method takes a `flush` flag. After appending, if `flush` is
/// set and the buffer holds unflushed non-block-aligned data (its position
/// is not 0), the entire current buffer is written once more to the *same*
/// block offset with overwrite-in-place semantics. That forces the partial
/// tail onto the medium without claiming the block is finished; the next
/// flush or wrap at that offset simply supersedes it. If the position is
/// already 0 - nothing appended, or a wrap just advanced - no extra write
/// occurs.
///
/// Methods return `&mut Self` so appends chain:
///
/// ```rust
/// use journ_core::{BlockStore, JournalWriter};
/// use journ_storage::MemoryDevice;
///
/// let store = BlockStore::with_device(Box::new(MemoryDevice::new()), 512).unwrap();
/// let mut journal = JournalWriter::new(512, store).unwrap();
/// journal
///     .write_i64(42, false)?
///     .write_bytes(b"payload", true)?;
/// # Ok::<(), journ_core::JournalError>(())
/// ```
///
/// Dropping the writer releases the store **without** flushing a pending
/// partial buffer; callers that need the tail durable must flush explicitly
/// first.
///
/// The writer assumes a single caller. It holds no locks and must not be
/// shared across threads.
#[derive(Debug)]
pub struct JournalWriter {
    ring: RingBuffer,
    store: BlockStore,
}

impl JournalWriter {
    /// Creates a writer staging `buffer_size` bytes in front of `store`.
    ///
    /// `buffer_size` must equal the store's block size; physical writes
    /// transfer exactly one block. A mismatch is a programming error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::JournalError::InvalidCapacity`] if `buffer_size` is
    /// zero.
    pub fn new(buffer_size: usize, store: BlockStore) -> JournalResult<Self> {
        debug_assert_eq!(
            buffer_size,
            store.block_size(),
            "journal buffer size must equal the store's block size"
        );
        Ok(Self {
            ring: RingBuffer::new(buffer_size)?,
            store,
        })
    }

    /// Creates a journal file at `path` per `config` and a writer over it.
    ///
    /// Pre-allocates the file if the config asks for it.
    ///
    /// # Errors
    ///
    /// Propagates [`BlockStore::create`] and [`BlockStore::set_size`]
    /// failures.
    pub fn create(path: impl AsRef<Path>, config: &JournalConfig) -> JournalResult<Self> {
        let mut store = BlockStore::create(path, config.block_size)?;
        if let Some(blocks) = config.preallocate_blocks {
            store.set_size(blocks)?;
        }
        debug!(block_size = config.block_size, "journal writer created");
        Self::new(config.block_size, store)
    }

    /// Appends a single byte.
    ///
    /// # Errors
    ///
    /// Propagates block store failures; the buffer cursor has already
    /// advanced past the byte when a physical write fails.
    pub fn write_byte(&mut self, value: u8, flush: bool) -> JournalResult<&mut Self> {
        self.push_byte(value)?;
        self.flush_partial(flush)?;
        Ok(self)
    }

    /// Appends a 32-bit integer, least-significant byte first.
    ///
    /// # Errors
    ///
    /// Propagates block store failures.
    pub fn write_i32(&mut self, value: i32, flush: bool) -> JournalResult<&mut Self> {
        for byte in value.to_le_bytes() {
            self.push_byte(byte)?;
        }
        self.flush_partial(flush)?;
        Ok(self)
    }

    /// Appends a 64-bit integer, least-significant byte first.
    ///
    /// # Errors
    ///
    /// Propagates block store failures.
    pub fn write_i64(&mut self, value: i64, flush: bool) -> JournalResult<&mut Self> {
        for byte in value.to_le_bytes() {
            self.push_byte(byte)?;
        }
        self.flush_partial(flush)?;
        Ok(self)
    }

    /// Appends a byte span in order.
    ///
    /// # Errors
    ///
    /// Propagates block store failures.
    pub fn write_bytes(&mut self, bytes: &[u8], flush: bool) -> JournalResult<&mut Self> {
        for &byte in bytes {
            self.push_byte(byte)?;
        }
        self.flush_partial(flush)?;
        Ok(self)
    }

    /// Serializes one byte, committing the block with advance semantics the
    /// moment the buffer wraps - before any later byte can overwrite it.
    fn push_byte(&mut self, value: u8) -> JournalResult<()> {
        if self.ring.write_byte(value) {
            self.store.write(self.ring.as_slice(), true)?;
        }
        Ok(())
    }

    /// Overwrite-in-place flush of the current buffer, if requested and if
    /// the buffer holds a partial block.
    fn flush_partial(&mut self, flush: bool) -> JournalResult<()> {
        if flush && self.ring.position() != 0 {
            self.store.write(self.ring.as_slice(), false)?;
        }
        Ok(())
    }
}
