//! In-memory block device for testing.

use crate::device::BlockDevice;
use crate::error::{StorageError, StorageResult};
use parking_lot::Mutex;
use std::sync::Arc;

/// One operation performed against a [`MemoryDevice`].
///
/// Tests use the recorded sequence to assert the exact physical-write
/// pattern a journal produced, including the seek-backs that distinguish
/// overwrite-in-place from an advancing write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceOp {
    /// A write of `len` bytes starting at `offset`.
    Write {
        /// Byte offset the write started at.
        offset: u64,
        /// Number of bytes transferred.
        len: usize,
    },
    /// A backward seek of `len` bytes.
    SeekBack {
        /// Number of bytes seeked back.
        len: u64,
    },
    /// A truncate/extend to `len` bytes.
    SetLen {
        /// The new device length.
        len: u64,
    },
    /// A rewind to offset 0.
    Rewind,
}

#[derive(Debug, Default)]
struct Inner {
    data: Vec<u8>,
    position: u64,
    ops: Vec<DeviceOp>,
}

/// An in-memory [`BlockDevice`] that records every operation.
///
/// The device simulates block-granular, cache-bypassing writes: each write
/// lands in the backing vector immediately, so its effect is observable the
/// moment the call returns, exactly like an uncached file.
///
/// Cloning yields a handle to the same underlying state. A test keeps one
/// clone for assertions and moves the other into the code under test.
///
/// # Example
///
/// ```rust
/// use journ_storage::{BlockDevice, DeviceOp, MemoryDevice};
///
/// let mut device = MemoryDevice::new();
/// let observer = device.clone();
///
/// device.write_all(&[1, 2, 3, 4]).unwrap();
/// assert_eq!(observer.data(), vec![1, 2, 3, 4]);
/// assert_eq!(observer.ops(), vec![DeviceOp::Write { offset: 0, len: 4 }]);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryDevice {
    inner: Arc<Mutex<Inner>>,
    sector_size: u64,
}

impl Default for MemoryDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDevice {
    /// Default sector size reported by the fake.
    pub const DEFAULT_SECTOR_SIZE: u64 = 512;

    /// Creates an empty device reporting a 512-byte sector size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sector_size(Self::DEFAULT_SECTOR_SIZE)
    }

    /// Creates an empty device reporting the given sector size.
    ///
    /// Small sector sizes keep block-alignment tests readable.
    #[must_use]
    pub fn with_sector_size(sector_size: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            sector_size,
        }
    }

    /// Returns a copy of the device contents.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.inner.lock().data.clone()
    }

    /// Returns the recorded operation sequence.
    #[must_use]
    pub fn ops(&self) -> Vec<DeviceOp> {
        self.inner.lock().ops.clone()
    }

    /// Returns only the recorded writes, as `(offset, len)` pairs.
    #[must_use]
    pub fn writes(&self) -> Vec<(u64, usize)> {
        self.inner
            .lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                DeviceOp::Write { offset, len } => Some((*offset, *len)),
                _ => None,
            })
            .collect()
    }

    /// Clears recorded operations, keeping contents and position.
    pub fn clear_ops(&self) {
        self.inner.lock().ops.clear();
    }
}

impl BlockDevice for MemoryDevice {
    fn sector_size(&self) -> StorageResult<u64> {
        Ok(self.sector_size)
    }

    fn write_all(&mut self, buf: &[u8]) -> StorageResult<()> {
        let mut inner = self.inner.lock();
        let offset = inner.position as usize;
        let end = offset + buf.len();

        if inner.data.len() < end {
            inner.data.resize(end, 0);
        }
        inner.data[offset..end].copy_from_slice(buf);
        inner.position = end as u64;
        inner.ops.push(DeviceOp::Write {
            offset: offset as u64,
            len: buf.len(),
        });
        Ok(())
    }

    fn seek_back(&mut self, len: u64) -> StorageResult<()> {
        let mut inner = self.inner.lock();
        let position = inner.position.checked_sub(len).ok_or_else(|| {
            StorageError::Io(std::io::Error::from(std::io::ErrorKind::InvalidInput))
        })?;
        inner.position = position;
        inner.ops.push(DeviceOp::SeekBack { len });
        Ok(())
    }

    fn set_len(&mut self, len: u64) -> StorageResult<()> {
        let mut inner = self.inner.lock();
        inner.data.resize(len as usize, 0);
        inner.ops.push(DeviceOp::SetLen { len });
        Ok(())
    }

    fn rewind(&mut self) -> StorageResult<()> {
        let mut inner = self.inner.lock();
        inner.position = 0;
        inner.ops.push(DeviceOp::Rewind);
        Ok(())
    }

    fn position(&mut self) -> StorageResult<u64> {
        Ok(self.inner.lock().position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_device_is_empty() {
        let mut device = MemoryDevice::new();
        assert!(device.data().is_empty());
        assert_eq!(device.position().unwrap(), 0);
        assert_eq!(device.sector_size().unwrap(), 512);
    }

    #[test]
    fn write_lands_immediately() {
        let mut device = MemoryDevice::new();
        device.write_all(b"hello").unwrap();

        assert_eq!(device.data(), b"hello");
        assert_eq!(device.position().unwrap(), 5);
    }

    #[test]
    fn overwrite_after_seek_back() {
        let mut device = MemoryDevice::new();
        device.write_all(b"aaaa").unwrap();
        device.seek_back(4).unwrap();
        device.write_all(b"bbbb").unwrap();

        assert_eq!(device.data(), b"bbbb");
    }

    #[test]
    fn seek_back_before_start_fails() {
        let mut device = MemoryDevice::new();
        device.write_all(b"ab").unwrap();
        assert!(device.seek_back(3).is_err());
    }

    #[test]
    fn set_len_extends_with_zeroes() {
        let mut device = MemoryDevice::new();
        device.write_all(b"xy").unwrap();
        device.set_len(6).unwrap();

        assert_eq!(device.data(), vec![b'x', b'y', 0, 0, 0, 0]);
    }

    #[test]
    fn clone_shares_state() {
        let mut device = MemoryDevice::new();
        let observer = device.clone();

        device.write_all(&[9]).unwrap();
        assert_eq!(observer.data(), vec![9]);
    }

    #[test]
    fn ops_record_the_full_sequence() {
        let mut device = MemoryDevice::new();
        device.write_all(&[1, 2]).unwrap();
        device.seek_back(2).unwrap();
        device.rewind().unwrap();
        device.set_len(8).unwrap();

        assert_eq!(
            device.ops(),
            vec![
                DeviceOp::Write { offset: 0, len: 2 },
                DeviceOp::SeekBack { len: 2 },
                DeviceOp::Rewind,
                DeviceOp::SetLen { len: 8 },
            ]
        );
    }

    #[test]
    fn custom_sector_size_is_reported() {
        let device = MemoryDevice::with_sector_size(64);
        assert_eq!(device.sector_size().unwrap(), 64);
    }
}
