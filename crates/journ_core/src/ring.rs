//! Fixed-capacity circular byte buffer with wrap detection.

use crate::error::{JournalError, JournalResult};

/// A circular byte buffer that stages one journal block.
///
/// The buffer has a fixed capacity and a single write cursor. Writing the
/// last byte of the capacity *wraps*: the cursor returns to 0 synchronously,
/// before the write call returns. Wraps are surfaced as return values -
/// [`RingBuffer::write_byte`] reports whether this byte wrapped, and the
/// multi-byte writes report how many wraps they crossed. Callers that need
/// to act on each wrap at its exact byte position (the journal writer does,
/// to commit the full block before later bytes overwrite it) feed bytes
/// through `write_byte` one at a time.
///
/// Multi-byte integers are stored least-significant byte first. A single
/// multi-byte write can cross more than one wrap only when the capacity is
/// smaller than the value's width; the counts stay exact even then.
///
/// The backing storage is zero-initialized and never resized.
#[derive(Debug)]
pub struct RingBuffer {
    buf: Box<[u8]>,
    position: usize,
}

impl RingBuffer {
    /// Creates a buffer of `capacity` bytes with the cursor at 0.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> JournalResult<Self> {
        if capacity == 0 {
            return Err(JournalError::InvalidCapacity { capacity });
        }
        Ok(Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            position: 0,
        })
    }

    /// Returns the buffer capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the current cursor position, always in `[0, capacity)`.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to `position`.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::PositionOutOfRange`] unless
    /// `position < capacity`.
    pub fn set_position(&mut self, position: usize) -> JournalResult<()> {
        if position >= self.buf.len() {
            return Err(JournalError::PositionOutOfRange {
                position,
                capacity: self.buf.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Stores `value` at the cursor.
    ///
    /// Returns `true` if this byte filled the last slot and the cursor
    /// wrapped back to 0.
    pub fn write_byte(&mut self, value: u8) -> bool {
        self.buf[self.position] = value;

        if self.position == self.buf.len() - 1 {
            self.position = 0;
            return true;
        }

        self.position += 1;
        false
    }

    /// Writes a 32-bit integer, least-significant byte first.
    ///
    /// Returns the number of wraps that occurred during the write.
    pub fn write_i32(&mut self, value: i32) -> usize {
        let mut wraps = 0;
        for byte in value.to_le_bytes() {
            if self.write_byte(byte) {
                wraps += 1;
            }
        }
        wraps
    }

    /// Writes a 64-bit integer, least-significant byte first.
    ///
    /// Returns the number of wraps that occurred during the write.
    pub fn write_i64(&mut self, value: i64) -> usize {
        let mut wraps = 0;
        for byte in value.to_le_bytes() {
            if self.write_byte(byte) {
                wraps += 1;
            }
        }
        wraps
    }

    /// Writes a byte span in order.
    ///
    /// Returns the number of wraps that occurred during the write.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        let mut wraps = 0;
        for &byte in bytes {
            if self.write_byte(byte) {
                wraps += 1;
            }
        }
        wraps
    }

    /// Exposes the whole backing storage as one block for physical I/O.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

impl std::ops::Index<usize> for RingBuffer {
    type Output = u8;

    /// Reads the byte stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    fn index(&self, index: usize) -> &u8 {
        &self.buf[index]
    }
}
