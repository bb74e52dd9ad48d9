//! Put-line vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use bytes::BytesMut;

use kairos_core::protocol::put::{encode_put_line, put_line, sanitize_name};
use kairos_core::{TagSet, Value};

use vector_loader::PutVector;

fn load(name: &str) -> PutVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

#[test]
fn put_vectors() {
    let files = [
        "put_int.json",
        "put_float.json",
        "put_whole_float.json",
        "put_exponent.json",
        "put_large.json",
        "put_negative_exponent.json",
        "put_whitespace.json",
        "put_whitespace_run.json",
        "put_tags.json",
        "put_nan.json",
        "put_pos_inf.json",
        "put_neg_inf.json",
    ];

    for f in files {
        let v = load(f);
        let tags = TagSet::try_from_pairs(v.tags.clone()).expect("vector tags must be valid");
        let line = put_line(&v.name, v.timestamp, &v.value(), &tags);
        assert_eq!(line, v.expect_line, "vector={}", v.description);
    }
}

#[test]
fn dropped_value_leaves_buffer_untouched() {
    let mut buf = BytesMut::from(&b"put a 1 1\n"[..]);
    let written = encode_put_line(
        &mut buf,
        "b",
        2,
        &Value::Float(f64::NAN),
        &TagSet::new(),
    );
    assert!(!written);
    assert_eq!(&buf[..], b"put a 1 1\n");
}

#[test]
fn lines_append_to_buffer() {
    let mut buf = BytesMut::new();
    let tags = TagSet::new();
    assert!(encode_put_line(&mut buf, "a", 1, &1i64.into(), &tags));
    assert!(encode_put_line(&mut buf, "b", 2, &0.5f64.into(), &tags));
    assert_eq!(&buf[..], b"put a 1 1\nput b 2 0.5\n");
}

#[test]
fn sanitize_keeps_non_whitespace() {
    assert_eq!(sanitize_name("app.db/pool_size-max"), "app.db/pool_size-max");
    assert_eq!(sanitize_name(" leading"), "-leading");
    assert_eq!(sanitize_name(""), "");
}

#[test]
fn sanitize_only_replaces_ascii_whitespace() {
    assert_eq!(sanitize_name("a\u{a0}b"), "a\u{a0}b");
    assert_eq!(sanitize_name("a\u{2003}b"), "a\u{2003}b");
    assert_eq!(sanitize_name("a\x0B\x0C\r\nb"), "a-b");
    assert_eq!(
        put_line("a\u{a0}b", 100, &Value::Int(1), &TagSet::new()).as_deref(),
        Some("put a\u{a0}b 100 1\n")
    );
}

#[test]
fn exponent_floats_always_carry_a_point() {
    let line = |v: f64| put_line("r", 100, &Value::Float(v), &TagSet::new());
    assert_eq!(line(1.0e-5).as_deref(), Some("put r 100 1.0e-5\n"));
    assert_eq!(line(1.0e16).as_deref(), Some("put r 100 1.0e16\n"));
    assert_eq!(line(-2.0e20).as_deref(), Some("put r 100 -2.0e20\n"));
    assert_eq!(line(6.649729418227556e-8).as_deref(), Some("put r 100 6.649729418227556e-8\n"));
    assert_eq!(line(1.0e15).as_deref(), Some("put r 100 1000000000000000.0\n"));
}
