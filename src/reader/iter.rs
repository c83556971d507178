//! Record Iterator
//!
//! Sequential walk over every record in file order, from the end of the
//! directory up to the first hash sub-table.

use crate::error::{ConstKvError, Result};
use crate::format::{decode_record, Record, HEADER_SIZE};

/// Iterator over all records of a database
#[derive(Debug, Clone)]
pub struct RecordIter<'a> {
    data: &'a [u8],
    /// Offset of the next record
    offset: usize,
    /// Start of the hash sub-tables (records stop here)
    end: usize,
}

impl<'a> RecordIter<'a> {
    /// Iterator that yields nothing (empty database)
    pub(crate) fn empty() -> Self {
        Self {
            data: &[],
            offset: 0,
            end: 0,
        }
    }

    /// Create an iterator over the record area `[2048, end)`
    pub(crate) fn new(data: &'a [u8], end: u32) -> Result<Self> {
        let end = end as usize;
        if end < HEADER_SIZE || end > data.len() {
            return Err(ConstKvError::corrupt(format!(
                "record area end {} outside [{}, {}]",
                end,
                HEADER_SIZE,
                data.len()
            )));
        }
        Ok(Self {
            data,
            offset: HEADER_SIZE,
            end,
        })
    }
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Result<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        // Stop at the first sub-table
        if self.offset >= self.end {
            return None;
        }

        // Only the record area is visible, so a record cannot spill into the tables
        let data: &'a [u8] = self.data;
        let area = &data[..self.end];
        let result = u32::try_from(self.offset)
            .map_err(|_| ConstKvError::corrupt(format!("record offset {} beyond 4 GiB", self.offset)))
            .and_then(|offset| decode_record(area, offset));

        match result {
            Ok(record) => {
                self.offset += record.encoded_len();
                Some(Ok(record))
            }
            Err(e) => {
                tracing::warn!(offset = self.offset, error = %e, "corrupt record during iteration");
                self.offset = self.end;
                Some(Err(e))
            }
        }
    }
}
