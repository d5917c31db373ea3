//! Image vaults
//!
//! A vault is text hidden after the end of an image file, fenced by marker
//! lines. Image decoders stop at the end of the image data, so the carrier
//! still renders while the front-end scans the raw bytes for the markers.

pub mod block;
pub mod carrier;

pub use block::{parse_entries, seal_block, vault_value, DEEP_MARKER, END_MARKER, START_MARKER};
pub use carrier::{append_vault, embed_payload, extract_vault, ExtractedVault};
