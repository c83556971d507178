//! Record decoding
//!
//! `[KeyLen: u32][ValLen: u32][Key][Value]`, sliced straight out of the
//! mapped file. Lengths come from the file, so every range is checked
//! against the buffer before slicing.

use crate::error::{ConstKvError, Result};

use super::{read_pair, RECORD_PREFIX_SIZE};

/// A key/value pair borrowed from the mapped file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub key: &'a [u8],
    pub value: &'a [u8],
}

impl<'a> Record<'a> {
    /// Bytes this record occupies on disk, prefix included
    pub fn encoded_len(&self) -> usize {
        RECORD_PREFIX_SIZE + self.key.len() + self.value.len()
    }
}

/// Decode the record starting at `offset`
pub fn decode_record(data: &[u8], offset: u32) -> Result<Record<'_>> {
    let start = offset as usize;

    let (key_len, value_len) = read_pair(data, start).ok_or_else(|| {
        ConstKvError::corrupt(format!(
            "record header at offset {} runs past end of file ({} bytes)",
            offset,
            data.len()
        ))
    })?;

    let key_start = start + RECORD_PREFIX_SIZE;
    let key_end = key_start
        .checked_add(key_len as usize)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| {
            ConstKvError::corrupt(format!(
                "record at offset {offset}: key length {key_len} exceeds file size {}",
                data.len()
            ))
        })?;
    let value_end = key_end
        .checked_add(value_len as usize)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| {
            ConstKvError::corrupt(format!(
                "record at offset {offset}: value length {value_len} exceeds file size {}",
                data.len()
            ))
        })?;

    Ok(Record {
        key: &data[key_start..key_end],
        value: &data[key_end..value_end],
    })
}
