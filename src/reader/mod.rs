//! Reader Module
//!
//! Read-only access to a constant database through a memory mapping.
//!
//! ## Responsibilities
//! - Map the file once at open and parse its directory
//! - Answer point lookups with slices borrowed from the mapping
//! - Release the mapping exactly once (explicit `close` or drop)
//!
//! ## Concurrency
//! The mapping and directory never change after `open`, so a `&ConstDb` can
//! be shared across threads and every lookup is a lock-free pure read.
//! `close` takes `&mut self`, which the borrow checker only grants once no
//! returned slice is alive.

mod iter;
mod probe;

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapOptions};
use tracing::{debug, warn};

use crate::error::{ConstKvError, Result};
use crate::format::{read_header, Header, HEADER_SIZE};

pub use iter::RecordIter;
pub use probe::Probe;

/// What currently backs the handle
enum Backing {
    /// Zero-length file: valid, never finds anything, nothing mapped
    Empty,
    /// Private read-only mapping of the whole file
    Mapped(Mmap),
    /// Mapping released by `close`
    Closed,
}

/// Summary of a database's directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbStats {
    pub file_size: u64,
    /// Buckets with at least one slot
    pub tables_in_use: usize,
    /// Slots across all sub-tables
    pub total_slots: u64,
}

/// An open constant database
pub struct ConstDb {
    path: PathBuf,
    file_size: u64,
    header: Header,
    backing: Backing,
}

impl ConstDb {
    /// Open a database file for lookups.
    ///
    /// A zero-length file opens as an empty database. A nonzero file shorter
    /// than the 2048-byte directory is rejected as corrupt.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();

        if file_size == 0 {
            debug!(path = %path.display(), "opened empty database");
            return Ok(Self {
                path: path.to_path_buf(),
                file_size,
                header: Header::empty(),
                backing: Backing::Empty,
            });
        }

        if file_size < HEADER_SIZE as u64 {
            warn!(path = %path.display(), file_size, "file too short for a database");
            return Err(ConstKvError::corrupt(format!(
                "file is too short for a database: {} < {} bytes",
                file_size, HEADER_SIZE
            )));
        }

        if usize::try_from(file_size).is_err() {
            return Err(ConstKvError::corrupt(format!(
                "file of {file_size} bytes cannot be mapped on this platform"
            )));
        }

        // SAFETY: the mapping is private and read-only, so this process never
        // writes through it. Database files are immutable once built; a file
        // truncated underneath us by another process is outside what any
        // mmap-based reader can defend against.
        let mmap = unsafe { MmapOptions::new().map_copy_read_only(&file)? };
        // The descriptor can be closed once the mapping exists
        drop(file);

        let header = read_header(&mmap)?;

        debug!(
            path = %path.display(),
            file_size,
            tables_in_use = header.tables_in_use(),
            "mapped database"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file_size,
            header,
            backing: Backing::Mapped(mmap),
        })
    }

    /// Mapped bytes (empty for an empty database)
    fn data(&self) -> Result<&[u8]> {
        match &self.backing {
            Backing::Empty => Ok(&[][..]),
            Backing::Mapped(mmap) => Ok(&mmap[..]),
            Backing::Closed => Err(ConstKvError::Closed),
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Get the first value stored under `key`.
    ///
    /// Returns:
    /// - `Ok(value)` - borrowed from the mapping, valid while `self` is
    /// - `Err(KeyNotFound)` - key not in this database
    /// - `Err(Corrupt)` - the probe path touched an out-of-range table or record
    pub fn lookup(&self, key: &[u8]) -> Result<&[u8]> {
        self.get_all(key)?
            .next()
            .unwrap_or(Err(ConstKvError::KeyNotFound))
    }

    /// Like [`lookup`](Self::lookup), with absence as `Ok(None)`
    pub fn get(&self, key: &[u8]) -> Result<Option<&[u8]>> {
        match self.lookup(key) {
            Ok(value) => Ok(Some(value)),
            Err(ConstKvError::KeyNotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn contains_key(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Iterate every value stored under `key` (duplicates are legal in the format)
    pub fn get_all<'a, 'k>(&'a self, key: &'k [u8]) -> Result<Probe<'a, 'k>> {
        let data = self.data()?;
        Probe::new(data, &self.header, key)
    }

    /// Iterate all records in file order
    pub fn iter(&self) -> Result<RecordIter<'_>> {
        let data = self.data()?;
        match self.header.records_end() {
            Some(end) if !data.is_empty() => RecordIter::new(data, end),
            _ => Ok(RecordIter::empty()),
        }
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// True when an open database has no slots in any bucket (zero-length
    /// file or empty directory). A closed handle is never empty.
    pub fn is_empty(&self) -> bool {
        !self.is_closed() && self.header.tables_in_use() == 0
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.backing, Backing::Closed)
    }

    pub fn stats(&self) -> Result<DbStats> {
        self.data()?;
        Ok(DbStats {
            file_size: self.file_size,
            tables_in_use: self.header.tables_in_use(),
            total_slots: self.header.total_slots(),
        })
    }

    /// CRC-32 of the whole file, for fingerprinting a build
    pub fn checksum(&self) -> Result<u32> {
        Ok(crc32fast::hash(self.data()?))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Release the mapping. Later calls are no-ops; later reads fail with `Closed`.
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        let previous = std::mem::replace(&mut self.backing, Backing::Closed);
        self.header = Header::empty();
        if let Backing::Mapped(mmap) = previous {
            drop(mmap);
            debug!(path = %self.path.display(), "unmapped database");
        }
    }
}

impl Drop for ConstDb {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ConstDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.backing {
            Backing::Empty => "empty",
            Backing::Mapped(_) => "mapped",
            Backing::Closed => "closed",
        };
        f.debug_struct("ConstDb")
            .field("path", &self.path)
            .field("file_size", &self.file_size)
            .field("state", &state)
            .finish()
    }
}
