//! Error types for constkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ConstKvError
pub type Result<T> = std::result::Result<T, ConstKvError>;

/// Unified error type for constkv operations
#[derive(Debug, Error)]
pub enum ConstKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Database Errors
    // -------------------------------------------------------------------------
    /// A structural invariant of the file does not hold (short file,
    /// offset or length outside the mapped range).
    #[error("Corrupt database: {0}")]
    Corrupt(String),

    #[error("Key not found")]
    KeyNotFound,

    #[error("Database handle is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Builder Errors
    // -------------------------------------------------------------------------
    /// One or more failures while feeding or waiting on the external builder.
    #[error("Builder error: {0}")]
    Builder(String),

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConstKvError {
    /// Shorthand for building a `Corrupt` error from anything displayable
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        ConstKvError::Corrupt(reason.into())
    }

    /// True for the expected, non-exceptional absence of a key
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConstKvError::KeyNotFound)
    }

    /// True when the file itself is structurally broken
    pub fn is_corrupt(&self) -> bool {
        matches!(self, ConstKvError::Corrupt(_))
    }
}
