//! Length-prefixed short strings
//!
//! A one-byte length followed by UTF-8 bytes. Handy for packing several
//! small fields into one value.

use crate::error::{ConstKvError, Result};

/// Longest string a one-byte prefix can describe
pub const MAX_SHORT_STR_LEN: usize = u8::MAX as usize;

/// Append `s` to `buf` as `[len: u8][bytes]`
pub fn append_short_str(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    let len = u8::try_from(s.len()).map_err(|_| {
        ConstKvError::Encoding(format!(
            "string of {} bytes exceeds {} byte limit",
            s.len(),
            MAX_SHORT_STR_LEN
        ))
    })?;
    buf.push(len);
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Read a short string from the front of `data`.
///
/// Returns the string and the number of bytes consumed (length byte included).
pub fn read_short_str(data: &[u8]) -> Result<(&str, usize)> {
    let (&len, rest) = data
        .split_first()
        .ok_or_else(|| ConstKvError::Encoding("missing length byte".to_string()))?;
    let len = usize::from(len);
    let bytes = rest.get(..len).ok_or_else(|| {
        ConstKvError::Encoding(format!(
            "string needs {} bytes, only {} available",
            len,
            rest.len()
        ))
    })?;
    let s = std::str::from_utf8(bytes)
        .map_err(|e| ConstKvError::Encoding(format!("invalid UTF-8: {e}")))?;
    Ok((s, len + 1))
}
