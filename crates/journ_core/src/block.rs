//! Block-oriented storage writer.

use crate::error::{JournalError, JournalResult};
use journ_storage::{sector_size_of, BlockDevice, DirectFile};
use std::path::Path;
use tracing::{debug, trace};

/// Writes fixed-size blocks to a backing device at block-granular offsets.
///
/// Every physical write transfers exactly one block. A write either
/// *advances* - the device position is left at the start of the next block -
/// or *overwrites in place* - the position is seeked back so the next write
/// lands at the same offset. Overwrite-in-place is how a partial block is
/// forced onto the medium without claiming the block is finished; a later
/// advancing write at the same offset supersedes it.
///
/// The block size must be a positive multiple of the device's sector size;
/// violations fail at construction, never at write time. The device handle
/// is released when the store is dropped (dropping does not flush anything).
pub struct BlockStore {
    device: Box<dyn BlockDevice>,
    block_size: usize,
}

impl BlockStore {
    /// Creates a new journal file at `path` and a store writing `block_size`
    /// byte blocks to it.
    ///
    /// The file is created exclusively (fails if one exists) and opened for
    /// uncached, sequential, write-only access with the cursor at the start.
    /// The sector size of the device hosting `path` is queried first and the
    /// block size validated against it, so no file is left behind on a
    /// validation failure.
    ///
    /// # Errors
    ///
    /// - [`JournalError::InvalidPath`] if `path` is empty
    /// - [`JournalError::InvalidBlockSize`] if `block_size` is zero or not a
    ///   multiple of the device sector size
    /// - [`JournalError::Storage`] if the file cannot be created
    pub fn create(path: impl AsRef<Path>, block_size: usize) -> JournalResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(JournalError::InvalidPath);
        }

        let sector_size = sector_size_of(path)?;
        validate_block_size(block_size, sector_size)?;

        let device = DirectFile::create(path, block_size)?;
        debug!(path = %path.display(), block_size, sector_size, "block store created");
        Ok(Self {
            device: Box::new(device),
            block_size,
        })
    }

    /// Creates a store over an already-open device, validating `block_size`
    /// against the sector size the device reports.
    ///
    /// This is how tests run the write path against
    /// [`journ_storage::MemoryDevice`].
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::InvalidBlockSize`] if `block_size` is zero or
    /// not a multiple of the device's sector size.
    pub fn with_device(
        device: Box<dyn BlockDevice>,
        block_size: usize,
    ) -> JournalResult<Self> {
        let sector_size = device.sector_size()?;
        validate_block_size(block_size, sector_size)?;
        Ok(Self { device, block_size })
    }

    /// Returns the configured block size in bytes.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Pre-allocates the backing object to `block_count` blocks and rewinds
    /// the write position to the start.
    ///
    /// Called before steady-state appends to avoid fragmentation and growth
    /// overhead. Each call truncates or extends to the new target and
    /// rewinds.
    ///
    /// # Errors
    ///
    /// Returns an error if the resize or seek fails.
    pub fn set_size(&mut self, block_count: u64) -> JournalResult<()> {
        let len = block_count * self.block_size as u64;
        self.device.set_len(len)?;
        self.device.rewind()?;
        debug!(block_count, len, "pre-allocated journal");
        Ok(())
    }

    /// Writes one block at the current position.
    ///
    /// With `advance` the position is left at the start of the next block.
    /// Without it the position is seeked back by one block after the
    /// transfer, so the next write overwrites the same offset.
    ///
    /// # Errors
    ///
    /// - [`JournalError::BlockLengthMismatch`] if `block` is not exactly one
    ///   block long
    /// - [`JournalError::Storage`] if the transfer or the seek fails
    pub fn write(&mut self, block: &[u8], advance: bool) -> JournalResult<()> {
        if block.len() != self.block_size {
            return Err(JournalError::BlockLengthMismatch {
                actual: block.len(),
                expected: self.block_size,
            });
        }

        self.device.write_all(block)?;
        if !advance {
            self.device.seek_back(self.block_size as u64)?;
        }
        trace!(len = block.len(), advance, "block written");
        Ok(())
    }
}

impl std::fmt::Debug for BlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockStore")
            .field("block_size", &self.block_size)
            .finish_non_exhaustive()
    }
}

fn validate_block_size(block_size: usize, sector_size: u64) -> JournalResult<()> {
    if block_size == 0 || block_size as u64 % sector_size != 0 {
        return Err(JournalError::InvalidBlockSize {
            block_size,
            sector_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use journ_storage::{DeviceOp, MemoryDevice};
    use tempfile::tempdir;

    const SECTOR: u64 = 64;
    const BLOCK: usize = 128;

    fn store() -> (BlockStore, MemoryDevice) {
        let device = MemoryDevice::with_sector_size(SECTOR);
        let observer = device.clone();
        let store = BlockStore::with_device(Box::new(device), BLOCK).unwrap();
        (store, observer)
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(
            BlockStore::create("", BLOCK),
            Err(JournalError::InvalidPath)
        ));
    }

    #[test]
    fn zero_block_size_is_rejected() {
        let device = MemoryDevice::with_sector_size(SECTOR);
        assert!(matches!(
            BlockStore::with_device(Box::new(device), 0),
            Err(JournalError::InvalidBlockSize { block_size: 0, .. })
        ));
    }

    #[test]
    fn misaligned_block_size_is_rejected() {
        let device = MemoryDevice::with_sector_size(SECTOR);
        assert!(matches!(
            BlockStore::with_device(Box::new(device), BLOCK - 1),
            Err(JournalError::InvalidBlockSize { .. })
        ));
    }

    #[test]
    fn sector_multiple_block_size_is_accepted() {
        let (store, _) = store();
        assert_eq!(store.block_size(), BLOCK);
    }

    #[test]
    fn wrong_block_length_is_rejected_at_write() {
        let (mut store, _) = store();
        let result = store.write(&[0u8; BLOCK - 1], true);
        assert!(matches!(
            result,
            Err(JournalError::BlockLengthMismatch {
                actual: 127,
                expected: BLOCK,
            })
        ));
    }

    #[test]
    fn advance_writes_append_monotonically() {
        let (mut store, observer) = store();

        store.write(&[0x11; BLOCK], true).unwrap();
        store.write(&[0x22; BLOCK], true).unwrap();

        let data = observer.data();
        assert_eq!(data.len(), 2 * BLOCK);
        assert!(data[..BLOCK].iter().all(|&b| b == 0x11));
        assert!(data[BLOCK..].iter().all(|&b| b == 0x22));
    }

    #[test]
    fn in_place_write_supersedes_previous() {
        let (mut store, observer) = store();

        store.write(&[0x11; BLOCK], false).unwrap();
        store.write(&[0x22; BLOCK], false).unwrap();

        let data = observer.data();
        assert_eq!(data.len(), BLOCK);
        assert!(data.iter().all(|&b| b == 0x22));
    }

    #[test]
    fn in_place_write_seeks_back_one_block() {
        let (mut store, observer) = store();
        store.write(&[0u8; BLOCK], false).unwrap();

        assert_eq!(
            observer.ops(),
            vec![
                DeviceOp::Write {
                    offset: 0,
                    len: BLOCK
                },
                DeviceOp::SeekBack { len: BLOCK as u64 },
            ]
        );
    }

    #[test]
    fn set_size_preallocates_and_rewinds() {
        let (mut store, observer) = store();

        store.set_size(4).unwrap();
        assert_eq!(observer.data().len(), 4 * BLOCK);

        // Steady-state writes start back at offset 0.
        store.write(&[0xEE; BLOCK], true).unwrap();
        assert_eq!(observer.writes(), vec![(0, BLOCK)]);
    }

    #[test]
    fn set_size_is_repeatable() {
        let (mut store, observer) = store();

        store.set_size(4).unwrap();
        store.set_size(2).unwrap();
        assert_eq!(observer.data().len(), 2 * BLOCK);
    }

    #[test]
    fn create_validates_against_real_device_sector_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.bin");

        // A 1-byte block cannot be a multiple of any real sector size.
        let result = BlockStore::create(&path, 1);
        assert!(matches!(result, Err(JournalError::InvalidBlockSize { .. })));
        // Validation failures must not leave a file behind.
        assert!(!path.exists());
    }

    #[test]
    fn create_writes_blocks_to_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.bin");
        let sector = sector_size_of(&path).unwrap();
        let block = sector as usize;

        let mut store = BlockStore::create(&path, block).unwrap();
        store.write(&vec![0xAB; block], true).unwrap();
        drop(store);

        let contents = std::fs::read(&path).unwrap();
        assert_eq!(contents.len(), block);
        assert!(contents.iter().all(|&b| b == 0xAB));
    }

    #[test]
    fn create_fails_if_file_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.bin");
        let sector = sector_size_of(&path).unwrap();

        let _first = BlockStore::create(&path, sector as usize).unwrap();
        let second = BlockStore::create(&path, sector as usize);
        assert!(matches!(second, Err(JournalError::Storage(_))));
    }
}
