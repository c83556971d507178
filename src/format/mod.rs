//! Format Module
//!
//! Bit-exact layout of a constant database file.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Directory (2048 bytes)                                  │
//! │   256 × [Position: u32][SlotCount: u32]                 │
//! │   entry i serves every key whose hash low byte is i     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Records (variable)                                      │
//! │   [KeyLen: u32][ValLen: u32][Key][Value]                │
//! │   ... repeated for each record ...                      │
//! ├─────────────────────────────────────────────────────────┤
//! │ Hash Sub-tables (variable)                              │
//! │   SlotCount × [Hash: u32][RecordPosition: u32]          │
//! │   (RecordPosition = 0 means empty slot)                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. A zero-length file is a valid, empty
//! database.
//!
//! Every offset and length in the file is untrusted. Reads go through
//! [`read_u32`]/[`read_pair`], which return `None` instead of indexing out
//! of range.

pub mod hash;
pub mod header;
pub mod record;
pub mod short_str;

pub use hash::hash;
pub use header::{read_header, Header, TablePointer};
pub use record::{decode_record, Record};
pub use short_str::{append_short_str, read_short_str};

// =============================================================================
// Shared Constants (used by header, record, prober)
// =============================================================================

/// Number of directory entries (one per hash low byte)
pub const TABLE_COUNT: usize = 256;

/// Directory entry width: Position (4) + SlotCount (4)
pub const HEADER_ENTRY_WIDTH: usize = 8;

/// Directory size: 256 × 8 = 2048 bytes
pub const HEADER_SIZE: usize = TABLE_COUNT * HEADER_ENTRY_WIDTH;

/// Slot width: Hash (4) + RecordPosition (4)
pub const SLOT_WIDTH: usize = 8;

/// Record prefix: KeyLen (4) + ValLen (4)
pub const RECORD_PREFIX_SIZE: usize = 8;

// =============================================================================
// Checked little-endian reads
// =============================================================================

/// Read a little-endian u32 at `offset`, or `None` if it would run past `data`
#[inline]
pub(crate) fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    let bytes: [u8; 4] = data.get(offset..end)?.try_into().ok()?;
    Some(u32::from_le_bytes(bytes))
}

/// Read two consecutive little-endian u32 values at `offset`
#[inline]
pub(crate) fn read_pair(data: &[u8], offset: usize) -> Option<(u32, u32)> {
    let first = read_u32(data, offset)?;
    let second = read_u32(data, offset.checked_add(4)?)?;
    Some((first, second))
}
