//! Export module for vaultsmith
//!
//! Generated documents are written as two-space indented JSON, either to
//! stdout or atomically to a file.

pub mod json;

pub use json::{export_json, write_json_atomic, write_pretty_json};
