//! Uncached file device and device sector size query.

use crate::aligned::AlignedBuf;
use crate::device::BlockDevice;
use crate::error::{StorageError, StorageResult};
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Returns the minimum I/O transfer granularity, in bytes, of the storage
/// device backing `path`.
///
/// The path itself does not need to exist yet; the query walks up to the
/// nearest existing ancestor directory, mirroring how a journal file is
/// validated before it is created.
///
/// # Errors
///
/// Returns an error if the filesystem query fails, or
/// [`StorageError::Unsupported`] on platforms without a `statvfs` equivalent.
#[cfg(unix)]
pub fn sector_size_of(path: &Path) -> StorageResult<u64> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let probe = nearest_existing_ancestor(path);
    let c_path = CString::new(probe.as_os_str().as_bytes())
        .map_err(|_| StorageError::Io(std::io::Error::from(std::io::ErrorKind::InvalidInput)))?;

    // SAFETY: statvfs writes into the zeroed out-param on success only.
    let mut vfs: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut vfs) };
    if rc != 0 {
        return Err(StorageError::Io(std::io::Error::last_os_error()));
    }
    Ok(vfs.f_bsize as u64)
}

/// Fallback for platforms without a `statvfs` equivalent.
#[cfg(not(unix))]
pub fn sector_size_of(_path: &Path) -> StorageResult<u64> {
    Err(StorageError::Unsupported("sector size query"))
}

#[cfg(unix)]
fn nearest_existing_ancestor(path: &Path) -> &Path {
    for ancestor in path.ancestors().skip(1) {
        if !ancestor.as_os_str().is_empty() && ancestor.exists() {
            return ancestor;
        }
    }
    Path::new(".")
}

/// A write-only file opened for uncached (direct) I/O.
///
/// The file is created with exclusive-create semantics: opening fails if a
/// file already exists at the path. On Linux the handle carries `O_DIRECT`;
/// on macOS page caching is disabled with `F_NOCACHE`. Filesystems that
/// reject direct I/O (tmpfs, some network mounts) get a plain handle instead
/// and [`DirectFile::is_direct`] reports the downgrade.
///
/// Direct I/O requires sector-aligned user memory, so outgoing data is
/// staged through an internal [`AlignedBuf`]; callers pass ordinary slices.
/// Transfer lengths and file offsets must still be sector-multiples, which
/// the journal's block invariants guarantee.
///
/// The handle is released when the value is dropped.
#[derive(Debug)]
pub struct DirectFile {
    file: File,
    path: PathBuf,
    sector_size: u64,
    direct: bool,
    staging: Option<AlignedBuf>,
}

impl DirectFile {
    /// Creates a new file at `path` opened for uncached, sequential,
    /// write-only access, positioned at offset 0.
    ///
    /// `io_size` is the expected transfer size per write; the internal
    /// staging buffer is sized to it up front.
    ///
    /// # Errors
    ///
    /// Returns an error if a file already exists at `path`, or if the file
    /// cannot be created.
    pub fn create(path: &Path, io_size: usize) -> StorageResult<Self> {
        let sector_size = sector_size_of(path)?;
        let (file, direct) = open_exclusive(path)?;
        debug!(path = %path.display(), sector_size, direct, "created journal file");

        Ok(Self {
            file,
            path: path.to_path_buf(),
            sector_size,
            direct,
            staging: (direct && io_size > 0).then(|| AlignedBuf::new(io_size)),
        })
    }

    /// Returns the path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if writes bypass the OS page cache.
    ///
    /// `false` means the filesystem rejected direct I/O and a plain handle
    /// is in use.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.direct
    }
}

impl BlockDevice for DirectFile {
    fn sector_size(&self) -> StorageResult<u64> {
        Ok(self.sector_size)
    }

    fn write_all(&mut self, buf: &[u8]) -> StorageResult<()> {
        if !self.direct {
            self.file.write_all(buf)?;
            return Ok(());
        }

        // Stage through aligned memory for the kernel.
        if self.staging.as_ref().map_or(true, |s| s.len() < buf.len()) {
            self.staging = Some(AlignedBuf::new(buf.len()));
        }
        let staging = self.staging.as_mut().ok_or_else(|| {
            StorageError::Io(std::io::Error::from(std::io::ErrorKind::InvalidInput))
        })?;
        staging[..buf.len()].copy_from_slice(buf);
        self.file.write_all(&staging[..buf.len()])?;
        Ok(())
    }

    fn seek_back(&mut self, len: u64) -> StorageResult<()> {
        let delta = i64::try_from(len)
            .map_err(|_| StorageError::Io(std::io::Error::from(std::io::ErrorKind::InvalidInput)))?;
        self.file.seek(SeekFrom::Current(-delta))?;
        Ok(())
    }

    fn set_len(&mut self, len: u64) -> StorageResult<()> {
        self.file.set_len(len)?;
        Ok(())
    }

    fn rewind(&mut self) -> StorageResult<()> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    fn position(&mut self) -> StorageResult<u64> {
        Ok(self.file.stream_position()?)
    }
}

/// Opens `path` with exclusive-create, write-only, uncached access.
///
/// Returns the handle and whether direct I/O is actually in effect.
#[cfg(target_os = "linux")]
fn open_exclusive(path: &Path) -> StorageResult<(File, bool)> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create_new(true);

    let mut direct_opts = opts.clone();
    direct_opts.custom_flags(libc::O_DIRECT);
    match direct_opts.open(path) {
        Ok(file) => Ok((file, true)),
        // Filesystems without direct I/O support report EINVAL at open time.
        Err(e) if e.raw_os_error() == Some(libc::EINVAL) => {
            warn!(path = %path.display(), "filesystem rejected O_DIRECT, using a cached handle");
            Ok((opts.open(path)?, false))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(target_os = "macos")]
fn open_exclusive(path: &Path) -> StorageResult<(File, bool)> {
    use std::os::unix::io::AsRawFd;

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;

    // SAFETY: plain fcntl on a freshly opened, owned descriptor.
    let rc = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_NOCACHE, 1) };
    if rc == -1 {
        warn!(path = %path.display(), "F_NOCACHE rejected, using a cached handle");
        return Ok((file, false));
    }
    Ok((file, true))
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn open_exclusive(path: &Path) -> StorageResult<(File, bool)> {
    let file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    Ok((file, false))
}
