//! # journ Core
//!
//! Block-oriented journal write path.
//!
//! A [`JournalWriter`] accumulates serialized primitive values and raw byte
//! spans in a fixed-size staging buffer and commits whole, sector-aligned
//! blocks to an uncached backing store. Callers decide, per append, whether
//! the current (possibly partial) block must be made durable immediately.
//!
//! The three pieces compose strictly downward:
//!
//! - [`RingBuffer`] - circular staging buffer with exact wrap detection
//! - [`BlockStore`] - fixed-size block writes with advance or
//!   overwrite-in-place semantics, alignment validation, pre-allocation
//! - [`JournalWriter`] - the append API and flush/advance policy
//!
//! ## Physical layout
//!
//! The journal file is a sequence of fixed-size blocks at monotonically
//! increasing offsets. Each block's bytes are the values serialized into it
//! in append order, multi-byte integers least-significant byte first.
//!
//! ## Concurrency
//!
//! Single-threaded and synchronous: every operation runs to completion on
//! the caller's thread, physical writes happen in the order their logical
//! operations were issued, and one writer exclusively owns its buffer and
//! store. There is no locking; sharing a writer across threads is not
//! supported.
//!
//! ## Example
//!
//! ```no_run
//! use journ_core::{JournalConfig, JournalWriter};
//!
//! let config = JournalConfig::new(4096).preallocate_blocks(1024);
//! let mut journal = JournalWriter::create("events.jrn", &config)?;
//!
//! journal
//!     .write_i64(1_700_000_000, false)?   // timestamp
//!     .write_i32(42, false)?              // event id
//!     .write_bytes(b"payload", true)?;    // force the partial block down
//! # Ok::<(), journ_core::JournalError>(())
//! ```

#![deny(unsafe_code)]

mod block;
mod config;
mod error;
mod journal;
mod ring;

pub use block::BlockStore;
pub use config::JournalConfig;
pub use error::{JournalError, JournalResult};
pub use journal::JournalWriter;
pub use ring::RingBuffer;
