//! Tests for the database reader
//!
//! These tests verify:
//! - Lookups, absence and hash collisions
//! - Duplicate keys and full iteration
//! - Corrupt and truncated files never crash the process
//! - Open/close lifecycle and concurrent readers

#[path = "../common/mod.rs"]
mod common;
