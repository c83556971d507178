//! Key hash
//!
//! The djb variant used for both placement and lookup:
//! `h = ((h << 5) + h) ^ c`, seeded with 5381, 32-bit wrapping.

/// Initial hash value
pub const HASH_SEED: u32 = 5381;

/// Hash a key the way the file was built
#[inline]
pub fn hash(key: &[u8]) -> u32 {
    key.iter().fold(HASH_SEED, |h, &c| {
        (h << 5).wrapping_add(h) ^ u32::from(c)
    })
}

/// Directory entry serving this hash (its low byte)
#[inline]
pub fn table_index(hash: u32) -> usize {
    (hash & 0xff) as usize
}

/// First slot to probe in a sub-table of `slot_count` slots.
/// `slot_count` must be nonzero.
#[inline]
pub fn start_slot(hash: u32, slot_count: u32) -> u32 {
    (hash >> 8) % slot_count
}
