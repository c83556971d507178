//! Directory (header table) parsing
//!
//! The first 2048 bytes of a non-empty file: 256 pointers to hash sub-tables.
//! Sub-table bounds are not checked here; the prober validates the one it
//! touches, so a damaged pointer only affects keys in that bucket.

use crate::error::{ConstKvError, Result};

use super::{read_pair, HEADER_ENTRY_WIDTH, HEADER_SIZE, SLOT_WIDTH, TABLE_COUNT};

/// Location and size of one hash sub-table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TablePointer {
    /// Byte offset of the sub-table within the file
    pub position: u32,
    /// Number of 8-byte slots; 0 means no key hashes to this bucket
    pub slot_count: u32,
}

impl TablePointer {
    pub fn is_empty(&self) -> bool {
        self.slot_count == 0
    }

    /// Byte range `[start, end)` the sub-table occupies, if it fits in `len`
    pub fn byte_range(&self, len: usize) -> Option<(usize, usize)> {
        let start = self.position as usize;
        let size = (self.slot_count as usize).checked_mul(SLOT_WIDTH)?;
        let end = start.checked_add(size)?;
        (end <= len).then_some((start, end))
    }
}

/// Parsed directory of a database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    tables: [TablePointer; TABLE_COUNT],
}

impl Default for Header {
    fn default() -> Self {
        Self::empty()
    }
}

impl Header {
    /// Directory of an empty database: every bucket has zero slots
    pub fn empty() -> Self {
        Self {
            tables: [TablePointer::default(); TABLE_COUNT],
        }
    }

    /// Pointer for directory entry `index` (0..256)
    pub fn table(&self, index: usize) -> TablePointer {
        self.tables[index & 0xff]
    }

    pub fn tables(&self) -> &[TablePointer; TABLE_COUNT] {
        &self.tables
    }

    /// Number of buckets with at least one slot
    pub fn tables_in_use(&self) -> usize {
        self.tables.iter().filter(|t| !t.is_empty()).count()
    }

    /// Sum of slot counts across all sub-tables
    pub fn total_slots(&self) -> u64 {
        self.tables.iter().map(|t| u64::from(t.slot_count)).sum()
    }

    /// End of the record area.
    ///
    /// Records are written before any sub-table, so the lowest position of
    /// an occupied sub-table marks where they stop. Empty buckets may carry
    /// any position and are ignored. `None` when no bucket has slots, since
    /// every record is referenced by some slot.
    pub fn records_end(&self) -> Option<u32> {
        self.tables
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| t.position)
            .min()
    }
}

/// Parse the 256-entry directory from the start of `data`
pub fn read_header(data: &[u8]) -> Result<Header> {
    if data.len() < HEADER_SIZE {
        return Err(ConstKvError::corrupt(format!(
            "file is too short for a directory: {} < {} bytes",
            data.len(),
            HEADER_SIZE
        )));
    }

    let mut header = Header::empty();
    for (i, table) in header.tables.iter_mut().enumerate() {
        let (position, slot_count) = read_pair(data, i * HEADER_ENTRY_WIDTH)
            .ok_or_else(|| ConstKvError::corrupt(format!("directory entry {i} unreadable")))?;
        *table = TablePointer {
            position,
            slot_count,
        };
    }

    Ok(header)
}
