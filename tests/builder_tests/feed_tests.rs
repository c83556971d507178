//! Feed encoding

use constkv::builder::{append_record, FeedWriter, FEED_TERMINATOR};

#[test]
fn test_two_record_feed() {
    let mut feed = FeedWriter::new(Vec::new());
    feed.add(b"a", b"123").unwrap();
    feed.add(b"b", b"456").unwrap();
    feed.finish().unwrap();

    assert_eq!(feed.into_inner(), b"+1,3:a->123\n+1,3:b->456\n\n");
}

#[test]
fn test_lengths_are_byte_counts() {
    let mut buf = Vec::new();
    append_record(&mut buf, "ключ".as_bytes(), "значение".as_bytes());
    assert!(buf.starts_with(b"+8,16:"));
    assert!(buf.ends_with(b"\n"));
}

#[test]
fn test_separator_bytes_inside_data_are_not_escaped() {
    let mut buf = Vec::new();
    append_record(&mut buf, b"a->b", b"c\nd");
    assert_eq!(buf, b"+4,3:a->b->c\nd\n");
}

#[test]
fn test_write_raw_passes_through() {
    let mut encoded = Vec::new();
    append_record(&mut encoded, b"k", b"v");

    let mut feed = FeedWriter::new(Vec::new());
    feed.write_raw(&encoded).unwrap();
    feed.finish().unwrap();

    // Raw writes are not counted as records
    assert_eq!(feed.records_written(), 0);
    let mut expected = encoded.clone();
    expected.extend_from_slice(FEED_TERMINATOR);
    assert_eq!(feed.into_inner(), expected);
}

#[test]
fn test_empty_feed_is_just_terminator() {
    let mut feed = FeedWriter::new(Vec::new());
    feed.finish().unwrap();
    assert_eq!(feed.into_inner(), b"\n");
}
