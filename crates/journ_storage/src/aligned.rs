//! Sector-aligned heap buffer for direct I/O.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Alignment used for direct-I/O staging buffers.
///
/// A page covers every sector size in the wild (512, 4096), so one constant
/// serves all devices.
const BUFFER_ALIGNMENT: usize = 4096;

/// A zero-initialized heap buffer aligned for direct I/O.
///
/// Direct (uncached) writes require the *memory* handed to the kernel to be
/// aligned to the device sector size, not just the file offset and transfer
/// length. [`super::DirectFile`] stages outgoing data through one of these so
/// its callers can pass ordinary slices.
///
/// Dereferences to `[u8]`.
#[derive(Debug)]
pub struct AlignedBuf {
    ptr: NonNull<u8>,
    len: usize,
}

// The buffer is an exclusively owned allocation.
unsafe impl Send for AlignedBuf {}

impl AlignedBuf {
    /// Allocates a zeroed buffer of `len` bytes, page-aligned.
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0 or the allocation fails, like `Vec` does.
    #[must_use]
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "AlignedBuf requires a non-zero length");
        let layout =
            Layout::from_size_align(len, BUFFER_ALIGNMENT).expect("invalid buffer layout");
        // SAFETY: layout has non-zero size, checked above.
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).unwrap_or_else(|| std::alloc::handle_alloc_error(layout));
        Self { ptr, len }
    }

    /// Returns the buffer length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer has zero length (never, by construction).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Deref for AlignedBuf {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        // SAFETY: ptr is valid for len bytes for the lifetime of self.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl DerefMut for AlignedBuf {
    fn deref_mut(&mut self) -> &mut [u8] {
        // SAFETY: ptr is valid for len bytes and exclusively owned.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for AlignedBuf {
    fn drop(&mut self) {
        let layout = Layout::from_size_align(self.len, BUFFER_ALIGNMENT)
            .expect("invalid buffer layout");
        // SAFETY: allocated in new() with the same layout.
        unsafe { dealloc(self.ptr.as_ptr(), layout) };
    }
}
