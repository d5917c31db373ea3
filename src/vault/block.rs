//! Vault text blocks and their `KEY::VALUE` entries

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine};

/// Line opening a vault block
pub const START_MARKER: &str = "MYRQAI_VAULT_START";
/// Line closing a vault block
pub const END_MARKER: &str = "MYRQAI_VAULT_END";
/// Separator introducing the optional deep layer inside a vault
pub const DEEP_MARKER: &str = "MYRQAI_VAULT_DEEP";

/// Fence fragment text between the start and end markers
///
/// Carriage returns are dropped so the block is identical regardless of the
/// line endings the fragment was authored with.
pub fn seal_block(fragment_text: &str) -> String {
    format!(
        "{}\n{}\n{}\n",
        START_MARKER,
        fragment_text.replace('\r', ""),
        END_MARKER
    )
}

/// Base64 of the sealed block, as stored in a signal's secret payload
pub fn vault_value(fragment_text: &str) -> String {
    STANDARD.encode(seal_block(fragment_text))
}

/// Parse `KEY::VALUE` lines
///
/// Blank lines and `#` comments are skipped. Keys are trimmed and
/// upper-cased; everything after the first `::` is the value. A later line
/// with the same key wins.
pub fn parse_entries(text: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();

    for line in text.lines() {
        let clean = line.trim();
        if clean.is_empty() || clean.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = clean.split_once("::") {
            let key = key.trim().to_uppercase();
            if !key.is_empty() {
                entries.insert(key, value.trim().to_string());
            }
        }
    }

    entries
}
