//! constkv CLI
//!
//! Command-line interface for querying and building constant databases.

use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use constkv::builder::append_record;
use constkv::{Builder, Config, ConstDb, ConstKvError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// constkv CLI
#[derive(Parser, Debug)]
#[command(name = "constkv-cli")]
#[command(about = "Query and build constant key/value databases")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the value stored under a key
    Get {
        /// Database file
        db: PathBuf,

        /// The key to look up (raw bytes of the argument, or hex with --hex)
        key: OsString,

        /// Decode the key argument as hex, for keys that are not valid text
        #[arg(short = 'x', long)]
        hex: bool,

        /// Print every value stored under the key, one per line
        #[arg(short, long)]
        all: bool,
    },

    /// Print every record in builder feed format
    Dump {
        /// Database file
        db: PathBuf,
    },

    /// Print directory statistics and the file checksum
    Stats {
        /// Database file
        db: PathBuf,
    },

    /// Build a database from tab-separated `key<TAB>value` lines
    Build {
        /// Destination database file
        db: PathBuf,

        /// Input file, one record per line
        input: PathBuf,

        /// External builder program
        #[arg(short, long, default_value = constkv::config::DEFAULT_BUILDER_PROGRAM)]
        builder: PathBuf,

        /// Builder argument placed before the destination (repeatable)
        #[arg(long = "arg", allow_hyphen_values = true, default_values_t = vec!["-c".to_string()])]
        builder_args: Vec<String>,
    },
}

fn main() {
    // Initialize tracing/logging (stderr, so stdout stays clean for values)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,constkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(args.command) {
        Ok(()) => {}
        Err(ConstKvError::KeyNotFound) => {
            eprintln!("key not found");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    }
}

fn run(command: Commands) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Get { db, key, hex, all } => {
            let key = key_bytes(&key, hex)?;
            let db = ConstDb::open(&db)?;
            if all {
                let mut found = false;
                for value in db.get_all(&key)? {
                    out.write_all(value?)?;
                    out.write_all(b"\n")?;
                    found = true;
                }
                if !found {
                    return Err(ConstKvError::KeyNotFound);
                }
            } else {
                out.write_all(db.lookup(&key)?)?;
                out.write_all(b"\n")?;
            }
        }

        Commands::Dump { db } => {
            let db = ConstDb::open(&db)?;
            let mut buf = Vec::new();
            for record in db.iter()? {
                let record = record?;
                buf.clear();
                append_record(&mut buf, record.key, record.value);
                out.write_all(&buf)?;
            }
            out.write_all(b"\n")?;
        }

        Commands::Stats { db } => {
            let db = ConstDb::open(&db)?;
            let stats = db.stats()?;
            let records = db.iter()?.count();
            writeln!(out, "path:          {}", db.path().display())?;
            writeln!(out, "file size:     {} bytes", stats.file_size)?;
            writeln!(out, "records:       {}", records)?;
            writeln!(out, "tables in use: {}/256", stats.tables_in_use)?;
            writeln!(out, "total slots:   {}", stats.total_slots)?;
            writeln!(out, "crc32:         {:08x}", db.checksum()?)?;
        }

        Commands::Build {
            db,
            input,
            builder,
            builder_args,
        } => {
            let config = Config::builder()
                .builder_program(builder)
                .builder_args(builder_args)
                .build();
            let builder = Builder::new(config)?;
            let count = build_from_tsv(&builder, &db, &input)?;
            tracing::info!("Wrote {} records to {}", count, db.display());
        }
    }

    out.flush()?;
    Ok(())
}

/// Bytes of a key argument, hex-decoded when requested
fn key_bytes(arg: &OsStr, hex: bool) -> Result<Vec<u8>> {
    if !hex {
        return Ok(arg.as_encoded_bytes().to_vec());
    }
    let text = arg
        .to_str()
        .ok_or_else(|| ConstKvError::Encoding("hex key is not valid text".to_string()))?;
    hex::decode(text).map_err(|e| ConstKvError::Encoding(format!("invalid hex key: {e}")))
}

/// Feed `key<TAB>value` lines from `input` to the builder
fn build_from_tsv(builder: &Builder, db: &Path, input: &Path) -> Result<u64> {
    let reader = BufReader::new(File::open(input)?);
    let mut count = 0;

    builder.create(db, |feed| {
        for (line_no, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let tab = line.iter().position(|&b| b == b'\t').ok_or_else(|| {
                ConstKvError::Encoding(format!("line {}: missing tab separator", line_no + 1))
            })?;
            feed.add(&line[..tab], &line[tab + 1..])?;
        }
        count = feed.records_written();
        Ok(())
    })?;

    Ok(count)
}
