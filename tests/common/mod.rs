//! Shared test fixtures
//!
//! A small writer for the database format, kept separate from the library
//! so tests check the reader against an independent encoder.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const HEADER_SIZE: usize = 2048;

/// How many slots each non-empty sub-table gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPolicy {
    /// Twice the key count, as real builders do (always leaves empty slots)
    Double,
    /// Exactly the key count: full tables with no empty slot
    Exact,
}

pub type OwnedRecord = (Vec<u8>, Vec<u8>);

pub fn djb_hash(key: &[u8]) -> u32 {
    let mut h: u32 = 5381;
    for &c in key {
        h = (h << 5).wrapping_add(h) ^ c as u32;
    }
    h
}

/// Encode `records` (in order) into a complete database image
pub fn build_db_bytes(records: &[OwnedRecord], policy: SlotPolicy) -> Vec<u8> {
    let mut data = vec![0u8; HEADER_SIZE];
    let mut buckets: Vec<Vec<(u32, u32)>> = vec![Vec::new(); 256];

    for (key, value) in records {
        let pos = data.len() as u32;
        data.extend_from_slice(&(key.len() as u32).to_le_bytes());
        data.extend_from_slice(&(value.len() as u32).to_le_bytes());
        data.extend_from_slice(key);
        data.extend_from_slice(value);
        let h = djb_hash(key);
        buckets[(h & 0xff) as usize].push((h, pos));
    }

    let mut directory = Vec::with_capacity(HEADER_SIZE);
    for bucket in &buckets {
        let slots = match policy {
            SlotPolicy::Double => bucket.len() * 2,
            SlotPolicy::Exact => bucket.len(),
        };
        let table_pos = data.len() as u32;
        directory.extend_from_slice(&table_pos.to_le_bytes());
        directory.extend_from_slice(&(slots as u32).to_le_bytes());

        let mut table = vec![(0u32, 0u32); slots];
        for &(h, pos) in bucket {
            let mut slot = (h >> 8) as usize % slots;
            while table[slot].1 != 0 {
                slot = (slot + 1) % slots;
            }
            table[slot] = (h, pos);
        }
        for (h, pos) in table {
            data.extend_from_slice(&h.to_le_bytes());
            data.extend_from_slice(&pos.to_le_bytes());
        }
    }

    data[..HEADER_SIZE].copy_from_slice(&directory);
    data
}

pub fn owned(records: &[(&str, &str)]) -> Vec<OwnedRecord> {
    records
        .iter()
        .map(|(k, v)| (k.as_bytes().to_vec(), v.as_bytes().to_vec()))
        .collect()
}

pub fn write_db(path: &Path, records: &[OwnedRecord], policy: SlotPolicy) {
    fs::write(path, build_db_bytes(records, policy)).unwrap();
}

/// Write a database into a fresh temp dir
pub fn setup_temp_db(records: &[(&str, &str)]) -> (TempDir, PathBuf) {
    setup_temp_db_with(&owned(records), SlotPolicy::Double)
}

pub fn setup_temp_db_with(records: &[OwnedRecord], policy: SlotPolicy) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.cdb");
    write_db(&path, records, policy);
    (temp_dir, path)
}

/// Write raw bytes as a database file
pub fn setup_temp_file(bytes: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("raw.cdb");
    fs::write(&path, bytes).unwrap();
    (temp_dir, path)
}

/// Overwrite a little-endian u32 at `offset` in an image
pub fn patch_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// `n` three-byte keys from a counter, values are the bytes reversed
pub fn sequential_records(n: u32) -> Vec<OwnedRecord> {
    (0..n)
        .map(|i| {
            let key = vec![i as u8, (i >> 8) as u8, (i >> 16) as u8];
            let value = vec![(i >> 16) as u8, (i >> 8) as u8, i as u8];
            (key, value)
        })
        .collect()
}
