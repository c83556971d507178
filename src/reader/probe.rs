//! Hash Table Prober
//!
//! Open-addressing search of one hash sub-table, starting at
//! `(hash >> 8) % slot_count` and wrapping to slot 0 after the last slot.
//!
//! The walk visits at most `slot_count` slots, so a damaged table with no
//! empty slot cannot loop forever. An empty slot (record position 0) ends
//! the search: a key is never stored past an empty slot on its probe path.

use crate::error::{ConstKvError, Result};
use crate::format::hash::{hash, start_slot, table_index};
use crate::format::{decode_record, read_pair, Header, SLOT_WIDTH};

/// Iterator over every value stored under one key, in probe order
#[derive(Debug, Clone)]
pub struct Probe<'a, 'k> {
    /// Whole mapped file (records are addressed from its start)
    data: &'a [u8],
    /// Slots of the sub-table serving this key's bucket
    table: &'a [u8],
    key: &'k [u8],
    hash: u32,
    /// Next slot index to read
    slot: usize,
    /// Slots left before the walk is forced to stop
    remaining: usize,
}

impl<'a, 'k> Probe<'a, 'k> {
    /// Resolve the sub-table for `key` and position the walk at its start slot.
    ///
    /// Fails with `Corrupt` if the sub-table extends past the end of `data`.
    pub(crate) fn new(data: &'a [u8], header: &Header, key: &'k [u8]) -> Result<Self> {
        let h = hash(key);
        let ptr = header.table(table_index(h));

        if ptr.is_empty() {
            return Ok(Self::exhausted(data, key, h));
        }

        let (start, end) = ptr.byte_range(data.len()).ok_or_else(|| {
            tracing::warn!(
                position = ptr.position,
                slot_count = ptr.slot_count,
                file_size = data.len(),
                "hash sub-table out of range"
            );
            ConstKvError::corrupt(format!(
                "hash table at {} with {} slots exceeds file size {}",
                ptr.position,
                ptr.slot_count,
                data.len()
            ))
        })?;

        Ok(Self {
            data,
            table: &data[start..end],
            key,
            hash: h,
            slot: start_slot(h, ptr.slot_count) as usize,
            remaining: ptr.slot_count as usize,
        })
    }

    fn exhausted(data: &'a [u8], key: &'k [u8], hash: u32) -> Self {
        Self {
            data,
            table: &[],
            key,
            hash,
            slot: 0,
            remaining: 0,
        }
    }

    /// Hash of the key being searched
    pub fn hash(&self) -> u32 {
        self.hash
    }

    fn slot_count(&self) -> usize {
        self.table.len() / SLOT_WIDTH
    }
}

impl<'a, 'k> Iterator for Probe<'a, 'k> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            self.remaining -= 1;

            let (slot_hash, record_position) = read_pair(self.table, self.slot * SLOT_WIDTH)?;

            self.slot += 1;
            if self.slot >= self.slot_count() {
                self.slot = 0;
            }

            if record_position == 0 {
                self.remaining = 0;
                return None;
            }

            if slot_hash != self.hash {
                continue;
            }

            match decode_record(self.data, record_position) {
                Ok(record) if record.key == self.key => return Some(Ok(record.value)),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(record_position, error = %e, "corrupt record on probe path");
                    self.remaining = 0;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}
