//! Hiding vault text in image files and reading it back

use std::fs;
use std::path::Path;

use serde::Serialize;

use super::block::{DEEP_MARKER, END_MARKER, START_MARKER};
use crate::error::{VaultsmithError, VaultsmithResult};

/// Vault text recovered from a carrier image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedVault {
    /// Trimmed text between the start and end markers
    pub text: String,
    /// Trimmed text following the first deep marker, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_layer: Option<String>,
}

fn read_input(path: &Path) -> VaultsmithResult<Vec<u8>> {
    fs::read(path)
        .map_err(|e| VaultsmithError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Concatenate an image and a vault file into `output`
///
/// Writes `image ++ "\n" ++ vault ++ "\n"` and returns the number of bytes
/// written. Neither input is interpreted.
pub fn append_vault(image: &Path, vault: &Path, output: &Path) -> VaultsmithResult<usize> {
    let image_bytes = read_input(image)?;
    let vault_bytes = read_input(vault)?;

    let mut out = Vec::with_capacity(image_bytes.len() + vault_bytes.len() + 2);
    out.extend_from_slice(&image_bytes);
    out.push(b'\n');
    out.extend_from_slice(&vault_bytes);
    out.push(b'\n');

    fs::write(output, &out).map_err(|e| {
        VaultsmithError::Io(format!("Failed to write {}: {}", output.display(), e))
    })?;

    tracing::debug!(
        image = %image.display(),
        vault = %vault.display(),
        output = %output.display(),
        bytes = out.len(),
        "appended vault"
    );
    Ok(out.len())
}

/// Append a single fenced payload line to in-memory image bytes
pub fn embed_payload(image: &[u8], payload: &str) -> VaultsmithResult<Vec<u8>> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(VaultsmithError::Validation("empty payload".to_string()));
    }

    let mut out = Vec::with_capacity(image.len() + payload.len() + 64);
    out.extend_from_slice(image);
    out.extend_from_slice(format!("\n{}\n", START_MARKER).as_bytes());
    out.extend_from_slice(payload.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(format!("{}\n", END_MARKER).as_bytes());
    Ok(out)
}

fn find_marker(bytes: &[u8], marker: &str, offset: usize) -> Option<usize> {
    let needle = marker.as_bytes();
    if offset > bytes.len() {
        return None;
    }
    bytes[offset..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + offset)
}

/// Locate and decode the vault hidden in carrier bytes
///
/// The end marker is only searched for after the start marker, so image data
/// that happens to contain the end marker earlier is ignored.
pub fn extract_vault(bytes: &[u8]) -> VaultsmithResult<ExtractedVault> {
    let start = find_marker(bytes, START_MARKER, 0)
        .ok_or_else(|| VaultsmithError::Vault("no vault start marker".to_string()))?;

    let vault_start = start + START_MARKER.len();
    let vault_end = find_marker(bytes, END_MARKER, vault_start)
        .ok_or_else(|| VaultsmithError::Vault("no vault end marker".to_string()))?;

    let text = String::from_utf8_lossy(&bytes[vault_start..vault_end])
        .trim()
        .to_string();
    if text.is_empty() {
        return Err(VaultsmithError::Vault("vault is empty".to_string()));
    }

    let deep_layer = text
        .split(DEEP_MARKER)
        .nth(1)
        .map(str::trim)
        .filter(|deep| !deep.is_empty())
        .map(str::to_string);

    Ok(ExtractedVault { text, deep_layer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::block::seal_block;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0xFF];

    #[test]
    fn test_append_vault_concatenates_with_newlines() {
        let temp_dir = TempDir::new().unwrap();
        let image = temp_dir.path().join("void.png");
        let vault = temp_dir.path().join("vault.txt");
        let output = temp_dir.path().join("out.png");

        fs::write(&image, PNG_HEADER).unwrap();
        fs::write(&vault, b"p1::abc").unwrap();

        let written = append_vault(&image, &vault, &output).unwrap();

        let mut expected = PNG_HEADER.to_vec();
        expected.extend_from_slice(b"\np1::abc\n");
        assert_eq!(fs::read(&output).unwrap(), expected);
        assert_eq!(written, expected.len());
    }

    #[test]
    fn test_append_vault_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let vault = temp_dir.path().join("vault.txt");
        fs::write(&vault, b"x").unwrap();

        let err = append_vault(
            &temp_dir.path().join("missing.png"),
            &vault,
            &temp_dir.path().join("out.png"),
        )
        .unwrap_err();

        assert!(matches!(err, VaultsmithError::Io(ref msg) if msg.contains("missing.png")));
    }

    #[test]
    fn test_extract_from_appended_block() {
        let mut carrier = PNG_HEADER.to_vec();
        carrier.push(b'\n');
        carrier.extend_from_slice(seal_block("P1::hello\nP2::world").as_bytes());

        let vault = extract_vault(&carrier).unwrap();
        assert_eq!(vault.text, "P1::hello\nP2::world");
        assert_eq!(vault.deep_layer, None);
    }

    #[test]
    fn test_embed_payload_round_trip() {
        let carrier = embed_payload(PNG_HEADER, "  p3::enc:v1:abc  ").unwrap();
        assert!(carrier.starts_with(PNG_HEADER));

        let vault = extract_vault(&carrier).unwrap();
        assert_eq!(vault.text, "p3::enc:v1:abc");
    }

    #[test]
    fn test_embed_empty_payload_rejected() {
        assert!(embed_payload(PNG_HEADER, "   ").unwrap_err().is_validation());
    }

    #[test]
    fn test_end_marker_before_start_is_ignored() {
        let mut carrier = b"MYRQAI_VAULT_END junk ".to_vec();
        carrier.extend_from_slice(seal_block("real").as_bytes());

        assert_eq!(extract_vault(&carrier).unwrap().text, "real");
    }

    #[test]
    fn test_deep_layer() {
        let block = seal_block("P1::surface\nMYRQAI_VAULT_DEEP\n  the deep part \n");
        let vault = extract_vault(block.as_bytes()).unwrap();

        assert_eq!(vault.deep_layer.as_deref(), Some("the deep part"));
    }

    #[test]
    fn test_missing_markers() {
        let err = extract_vault(PNG_HEADER).unwrap_err();
        assert!(matches!(err, VaultsmithError::Vault(ref m) if m.contains("start")));

        let err = extract_vault(b"MYRQAI_VAULT_START\nno end").unwrap_err();
        assert!(matches!(err, VaultsmithError::Vault(ref m) if m.contains("end")));
    }

    #[test]
    fn test_empty_vault() {
        let err = extract_vault(b"MYRQAI_VAULT_START\n \n MYRQAI_VAULT_END").unwrap_err();
        assert!(matches!(err, VaultsmithError::Vault(ref m) if m.contains("empty")));
    }
}
