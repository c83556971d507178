//! Configuration for constkv
//!
//! Settings for the external database builder that produces the files this
//! crate reads. Reading needs no configuration.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{ConstKvError, Result};

/// Default external builder program, looked up in `PATH`
pub const DEFAULT_BUILDER_PROGRAM: &str = "cdb";

/// Main configuration for the ingestion side of constkv
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Builder Process Configuration
    // -------------------------------------------------------------------------
    /// Program that reads the record feed on stdin and writes the database.
    pub builder_program: PathBuf,

    /// Arguments passed before the destination path.
    /// The destination file is always appended as the final argument:
    ///   {builder_program} {builder_args...} {outfile}
    pub builder_args: Vec<OsString>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            builder_program: PathBuf::from(DEFAULT_BUILDER_PROGRAM),
            builder_args: vec![OsString::from("-c")],
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the configuration can be used to spawn a builder
    pub fn validate(&self) -> Result<()> {
        if self.builder_program.as_os_str().is_empty() {
            return Err(ConstKvError::Config(
                "builder program must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the external builder program
    pub fn builder_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.config.builder_program = program.into();
        self
    }

    /// Replace the arguments passed ahead of the destination path
    pub fn builder_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.config.builder_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Append a single argument
    pub fn builder_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.config.builder_args.push(arg.into());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
