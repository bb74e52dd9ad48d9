//! `put` line encoding.
//!
//! Line layout (ASCII, newline-terminated):
//! `put <name> <epoch-ms> <value>[ <tag>=<value>]*\n`
//!
//! ASCII whitespace runs in the name collapse to a single `-`. Non-finite values
//! produce no line at all.

use std::fmt::Write as _;

use bytes::{BufMut, BytesMut};

use crate::protocol::tag::TagSet;
use crate::value::Value;

/// Replace every run of ASCII whitespace (` \t\n\x0B\x0C\r`) with a single `-`.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_ws = false;
    for c in name.chars() {
        if matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r') {
            if !in_ws {
                out.push('-');
            }
            in_ws = true;
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    out
}

/// Append one `put` line to `buf`.
///
/// Returns `false` (and leaves `buf` untouched) when `value` is NaN or
/// infinite.
pub fn encode_put_line(
    buf: &mut BytesMut,
    name: &str,
    timestamp: i64,
    value: &Value,
    tags: &TagSet,
) -> bool {
    if !value.is_finite() {
        return false;
    }

    let mut line = String::with_capacity(name.len() + 48);
    line.push_str("put ");
    line.push_str(&sanitize_name(name));
    let _ = write!(line, " {timestamp} {value}");
    for (k, v) in tags.iter() {
        let _ = write!(line, " {k}={v}");
    }
    line.push('\n');

    buf.put_slice(line.as_bytes());
    true
}

/// Convenience wrapper returning the line as a `String`.
pub fn put_line(name: &str, timestamp: i64, value: &Value, tags: &TagSet) -> Option<String> {
    let mut buf = BytesMut::new();
    if !encode_put_line(&mut buf, name, timestamp, value, tags) {
        return None;
    }
    String::from_utf8(buf.to_vec()).ok()
}
