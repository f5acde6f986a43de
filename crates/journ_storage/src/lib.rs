//! # journ Storage
//!
//! Device capability layer for journ.
//!
//! This crate provides the two capabilities the journal core consumes from
//! its environment:
//!
//! - opening a backing file for uncached, write-only, exclusive-create access
//!   ([`DirectFile`])
//! - querying the minimum I/O granularity of the device hosting a path
//!   ([`sector_size_of`])
//!
//! Both sit behind the [`BlockDevice`] trait so the core stays
//! platform-neutral and can be exercised against [`MemoryDevice`], an
//! in-memory fake that records every operation it is asked to perform.
//!
//! ## Design Principles
//!
//! - Devices are opaque byte sinks: write at the current position, seek
//!   backward, truncate/extend and rewind. No format interpretation.
//! - Uncached writes bypass the OS page cache so the journal's own
//!   flush/advance policy is the only buffering layer.
//! - Alignment requirements of direct I/O are absorbed here: [`DirectFile`]
//!   stages outgoing data through a sector-aligned bounce buffer, so callers
//!   hand in ordinary slices.

mod aligned;
mod device;
mod error;
mod file;
mod memory;

pub use aligned::AlignedBuf;
pub use device::BlockDevice;
pub use error::{StorageError, StorageResult};
pub use file::{sector_size_of, DirectFile};
pub use memory::{DeviceOp, MemoryDevice};
