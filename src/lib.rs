//! # constkv
//!
//! Read-only access to constant (cdb-format) key/value databases:
//! - Files are memory-mapped, never loaded into the heap
//! - Point lookups return slices borrowed from the mapping
//! - Every offset read from the file is bounds-checked, so a corrupt or
//!   truncated file yields an error instead of a crash
//! - Databases are produced by an external builder fed over stdin
//!
//! ## Architecture Overview
//!
//! ```text
//!   (key, value) pairs
//!          │
//!          ▼
//!   ┌─────────────┐  stdin   ┌──────────────────┐
//!   │   Builder   │ ───────▶ │ external builder │
//!   │   (feed)    │          │   (cdb -c out)   │
//!   └─────────────┘          └────────┬─────────┘
//!                                     │ writes
//!                                     ▼
//!                            ┌──────────────────┐
//!                            │  database file   │
//!                            └────────┬─────────┘
//!                                     │ mmap (read-only)
//!                                     ▼
//!   ┌─────────────────────────────────────────────────────────┐
//!   │                        ConstDb                           │
//!   │   Header (256 table pointers, parsed once at open)       │
//!   └─────────────────────┬───────────────────────────────────┘
//!                         │ lookup(key)
//!                         ▼
//!   hash(key) ──▶ header[h & 0xff] ──▶ Probe (bounded, wrapping)
//!                                          │
//!                                          ▼
//!                                   decode_record ──▶ &[u8]
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod format;
pub mod reader;
pub mod builder;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use builder::Builder;
pub use config::Config;
pub use error::{ConstKvError, Result};
pub use reader::{ConstDb, DbStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of constkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
