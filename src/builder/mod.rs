//! Builder Module
//!
//! Produces database files by feeding records to an external builder
//! program (by default `cdb -c <outfile>`). This crate never writes the
//! binary format itself.
//!
//! ## Protocol
//! ```text
//!   constkv ──stdin──▶ {program} {args...} {outfile}
//!
//!   +1,3:a->123\n
//!   +1,3:b->456\n
//!   \n                 (blank line ends the feed)
//! ```
//!
//! The terminating blank line is only written when the caller's creator
//! succeeds. An unterminated feed makes the builder reject the input
//! instead of producing a partial database.

mod feed;

use std::io::BufWriter;
use std::path::Path;
use std::process::{ChildStdin, Command, Stdio};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ConstKvError, Result};

pub use feed::{append_record, FeedWriter, FEED_TERMINATOR};

/// Feed handed to a creator callback: buffered writes into the builder's stdin
pub type BuilderFeed = FeedWriter<BufWriter<ChildStdin>>;

/// Runs the external database builder
#[derive(Debug, Clone)]
pub struct Builder {
    config: Config,
}

impl Builder {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build `outfile` from the records `creator` writes to the feed.
    ///
    /// Every failure along the way (creator, feed write, stdin close,
    /// non-zero exit) is collected and returned together. Stdin is closed
    /// and the child reaped on every path once it has been spawned.
    pub fn create<F>(&self, outfile: impl AsRef<Path>, creator: F) -> Result<()>
    where
        F: FnOnce(&mut BuilderFeed) -> Result<()>,
    {
        let outfile = outfile.as_ref();
        debug!(
            program = %self.config.builder_program.display(),
            args = ?self.config.builder_args,
            outfile = %outfile.display(),
            "spawning database builder"
        );

        let mut child = Command::new(&self.config.builder_program)
            .args(&self.config.builder_args)
            .arg(outfile)
            .stdin(Stdio::piped())
            .spawn()?;

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ConstKvError::Builder(
                "builder stdin was not captured".to_string(),
            ));
        };

        let mut errors = Vec::new();
        let mut feed = FeedWriter::new(BufWriter::new(stdin));

        match creator(&mut feed) {
            Ok(()) => {
                if let Err(e) = feed.finish() {
                    errors.push(format!("feed: {e}"));
                }
            }
            Err(e) => errors.push(format!("creator: {e}")),
        }
        let records = feed.records_written();

        // Dropping stdin is what tells the builder the input has ended
        match feed.into_inner().into_inner() {
            Ok(stdin) => drop(stdin),
            Err(e) => errors.push(format!("close: {}", e.error())),
        }

        match child.wait() {
            Ok(status) if status.success() => {}
            Ok(status) => errors.push(format!("builder exited with {status}")),
            Err(e) => errors.push(format!("wait: {e}")),
        }

        if !errors.is_empty() {
            warn!(outfile = %outfile.display(), ?errors, "database build failed");
            return Err(ConstKvError::Builder(errors.join("; ")));
        }

        info!(outfile = %outfile.display(), records, "database built");
        Ok(())
    }

    /// Build `outfile` from an iterator of key/value pairs.
    ///
    /// Returns the number of records fed.
    pub fn create_from<I, K, V>(&self, outfile: impl AsRef<Path>, records: I) -> Result<u64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let mut count = 0;
        self.create(outfile, |feed| {
            for (key, value) in records {
                feed.add(key.as_ref(), value.as_ref())?;
            }
            count = feed.records_written();
            Ok(())
        })?;
        Ok(count)
    }
}
