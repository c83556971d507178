//! Builder process handling, using `sh` as a stand-in builder

use std::fs;
use std::path::PathBuf;

use constkv::{Builder, Config, ConstKvError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// A builder that copies its stdin verbatim into the destination file
fn capturing_builder() -> Builder {
    let config = Config::builder()
        .builder_program("sh")
        .builder_args(["-c", "cat > \"$0\""])
        .build();
    Builder::new(config).unwrap()
}

fn shell_builder(script: &str) -> Builder {
    let config = Config::builder()
        .builder_program("sh")
        .builder_args(["-c", script])
        .build();
    Builder::new(config).unwrap()
}

fn setup_temp_out() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.cdb");
    (temp_dir, path)
}

// =============================================================================
// Success Paths
// =============================================================================

#[test]
fn test_create_feeds_records_and_terminator() {
    let (_temp, out) = setup_temp_out();
    let builder = capturing_builder();

    builder
        .create(&out, |feed| {
            feed.add(b"a", b"123")?;
            feed.add(b"b", b"456")?;
            Ok(())
        })
        .unwrap();

    assert_eq!(fs::read(&out).unwrap(), b"+1,3:a->123\n+1,3:b->456\n\n");
}

#[test]
fn test_create_from_counts_records() {
    let (_temp, out) = setup_temp_out();
    let builder = capturing_builder();

    let pairs = vec![("x", "1"), ("y", "22"), ("z", "333")];
    let count = builder.create_from(&out, pairs).unwrap();

    assert_eq!(count, 3);
    assert_eq!(
        fs::read(&out).unwrap(),
        b"+1,1:x->1\n+1,2:y->22\n+1,3:z->333\n\n"
    );
}

#[test]
fn test_create_large_feed() {
    let (_temp, out) = setup_temp_out();
    let builder = capturing_builder();

    let count = builder
        .create_from(&out, (0..50_000u32).map(|i| (i.to_le_bytes(), i.to_be_bytes())))
        .unwrap();

    assert_eq!(count, 50_000);
    let written = fs::read(&out).unwrap();
    assert!(written.ends_with(b"\n\n"));
    // "+4,4:" + key + "->" + value + "\n" per record, then the blank line
    assert_eq!(written.len(), 50_000 * 16 + 1);
}

// =============================================================================
// Failure Paths
// =============================================================================

#[test]
fn test_creator_error_leaves_feed_unterminated() {
    let (_temp, out) = setup_temp_out();
    let builder = capturing_builder();

    let err = builder
        .create(&out, |feed| {
            feed.add(b"a", b"1")?;
            Err(ConstKvError::Encoding("bad input".to_string()))
        })
        .unwrap_err();

    match err {
        ConstKvError::Builder(msg) => assert!(msg.contains("bad input"), "{msg}"),
        other => panic!("expected Builder error, got {other}"),
    }
    // Stdin was still closed (cat finished) but no blank line was sent
    assert_eq!(fs::read(&out).unwrap(), b"+1,1:a->1\n");
}

#[test]
fn test_nonzero_exit_is_reported() {
    let (_temp, out) = setup_temp_out();
    let builder = shell_builder("cat > /dev/null; exit 3");

    let err = builder
        .create(&out, |feed| feed.add(b"a", b"1"))
        .unwrap_err();

    match err {
        ConstKvError::Builder(msg) => assert!(msg.contains("exited"), "{msg}"),
        other => panic!("expected Builder error, got {other}"),
    }
}

#[test]
fn test_builder_that_stops_reading() {
    let (_temp, out) = setup_temp_out();
    let builder = shell_builder("exit 0");

    let big = vec![b'v'; 1 << 20];
    let result = builder.create(&out, |feed| {
        for _ in 0..4 {
            feed.add(b"k", &big)?;
        }
        Ok(())
    });

    assert!(matches!(result, Err(ConstKvError::Builder(_))));
}

#[test]
fn test_missing_program_is_io_error() {
    let (_temp, out) = setup_temp_out();
    let config = Config::builder()
        .builder_program("/nonexistent/constkv-builder")
        .build();
    let builder = Builder::new(config).unwrap();

    let err = builder.create(&out, |_| Ok(())).unwrap_err();
    assert!(matches!(err, ConstKvError::Io(_)));
}

#[test]
fn test_invalid_config_rejected() {
    let config = Config::builder().builder_program("").build();
    assert!(matches!(Builder::new(config), Err(ConstKvError::Config(_))));
}
