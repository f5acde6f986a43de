//! Journal configuration.

/// Configuration for creating a journal.
///
/// # Example
///
/// ```rust
/// use journ_core::JournalConfig;
///
/// let config = JournalConfig::new(4096).preallocate_blocks(1024);
/// assert_eq!(config.block_size, 4096);
/// ```
#[derive(Debug, Clone)]
pub struct JournalConfig {
    /// Size of the staging buffer and of every physical block, in bytes.
    ///
    /// Must be a multiple of the sector size of the device hosting the
    /// journal file.
    pub block_size: usize,

    /// Number of blocks to pre-allocate before steady-state appends.
    ///
    /// `None` skips pre-allocation and lets the file grow write by write.
    pub preallocate_blocks: Option<u64>,
}

impl JournalConfig {
    /// Creates a configuration with the given block size and no
    /// pre-allocation.
    #[must_use]
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            preallocate_blocks: None,
        }
    }

    /// Sets the number of blocks to pre-allocate.
    #[must_use]
    pub const fn preallocate_blocks(mut self, blocks: u64) -> Self {
        self.preallocate_blocks = Some(blocks);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_no_preallocation() {
        let config = JournalConfig::new(4096);
        assert_eq!(config.block_size, 4096);
        assert!(config.preallocate_blocks.is_none());
    }

    #[test]
    fn builder_sets_preallocation() {
        let config = JournalConfig::new(512).preallocate_blocks(8);
        assert_eq!(config.preallocate_blocks, Some(8));
    }
}
