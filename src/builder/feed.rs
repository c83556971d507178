//! Builder feed encoding
//!
//! The textual record format the external builder reads on stdin:
//! `+<klen>,<vlen>:<key>-><value>\n` per record, then one blank line.

use std::io::Write;

use crate::error::Result;

/// Line that terminates the feed
pub const FEED_TERMINATOR: &[u8] = b"\n";

/// Append one feed record for `(key, value)` to `buf`
pub fn append_record(buf: &mut Vec<u8>, key: &[u8], value: &[u8]) {
    buf.push(b'+');
    buf.extend_from_slice(key.len().to_string().as_bytes());
    buf.push(b',');
    buf.extend_from_slice(value.len().to_string().as_bytes());
    buf.push(b':');
    buf.extend_from_slice(key);
    buf.extend_from_slice(b"->");
    buf.extend_from_slice(value);
    buf.push(b'\n');
}

/// Writes feed records to an underlying stream
pub struct FeedWriter<W: Write> {
    writer: W,
    /// Scratch buffer reused across records
    buf: Vec<u8>,
    records_written: u64,
}

impl<W: Write> FeedWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf: Vec::new(),
            records_written: 0,
        }
    }

    /// Write one `(key, value)` record
    pub fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.buf.clear();
        append_record(&mut self.buf, key, value);
        self.writer.write_all(&self.buf)?;
        self.records_written += 1;
        Ok(())
    }

    /// Write raw, already-encoded feed bytes (e.g. built with [`append_record`])
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Write the terminating blank line and flush
    pub fn finish(&mut self) -> Result<()> {
        self.writer.write_all(FEED_TERMINATOR)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
