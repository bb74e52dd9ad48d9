//! Telnet `put` protocol modules.
//!
//! - `name`: dotted metric names built from optional components.
//! - `tag`: tag validation and the ordered tag set sent with every line.
//! - `put`: line encoder (`put <name> <ts> <value>[ <k>=<v>]*\n`).
//!
//! Encoders are panic-free: invalid tags are rejected when the tag set is
//! built, so writing a line never fails on content.

pub mod name;
pub mod put;
pub mod tag;
