//! Blueprint builder
//!
//! Authors describe signals in a blueprint file that still contains the
//! plain answer and any passphrase. Building strips those dev-only fields,
//! replaces the answer with a salted SHA-256 hash and wraps the fragment in a
//! vault block, optionally encrypting it first.

use std::path::Path;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::model::payload_line;
use crate::crypto::envelope;
use crate::error::{VaultsmithError, VaultsmithResult};
use crate::vault::vault_value;

/// Random bytes in a generated answer salt (hex encoded in output)
const ANSWER_SALT_BYTES: usize = 12;

/// One authoring entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Blueprint {
    #[serde(default)]
    pub signal_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub difficulty: Option<u32>,
    #[serde(default)]
    pub transmission_type: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub hint_mask: Option<String>,
    #[serde(default)]
    pub synchronicity_weight: Option<u32>,
    #[serde(default)]
    pub unlock_fragment: Option<String>,
    #[serde(default)]
    pub dev_answer: Option<String>,
    #[serde(default)]
    pub fragment_text: Option<String>,
    /// `"enc"` to encrypt the fragment with `dev_passphrase`
    #[serde(default)]
    pub fragment_mode: Option<String>,
    #[serde(default)]
    pub dev_passphrase: Option<String>,
    /// Fixed answer salt; a random one is generated when absent
    #[serde(default)]
    pub salt: Option<String>,
}

/// A built signal, safe to publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub signal_id: String,
    pub title: String,
    pub difficulty: u32,
    pub transmission_type: String,
    pub secret_payload: String,
    pub hint_mask: String,
    pub synchronicity_weight: u32,
    pub unlock_fragment: String,
    pub prompt: String,
    pub salt: String,
    pub answer_hash: String,
}

/// Trim and upper-case an answer
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_uppercase()
}

/// Lowercase hex SHA-256 of a UTF-8 string
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

fn answer_hash(salt: &str, normalized_answer: &str) -> String {
    sha256_hex(&format!("{}:{}", salt, normalized_answer))
}

fn random_salt() -> String {
    let mut bytes = [0u8; ANSWER_SALT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn required<'a>(value: &'a Option<String>, name: &str, index: usize) -> VaultsmithResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(VaultsmithError::Validation(format!(
            "blueprint #{}: missing required field: {}",
            index + 1,
            name
        ))),
    }
}

fn non_empty_or(value: &Option<String>, fallback: impl FnOnce() -> String) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback(),
    }
}

/// Read a blueprint file holding a JSON array of entries
pub fn load_blueprints(path: &Path) -> VaultsmithResult<Vec<Blueprint>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        VaultsmithError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        VaultsmithError::Json(format!(
            "{} must be a JSON array of blueprints: {}",
            path.display(),
            e
        ))
    })
}

fn build_signal(blueprint: &Blueprint, index: usize, iterations: u32) -> VaultsmithResult<Signal> {
    let signal_id = required(&blueprint.signal_id, "signal_id", index)?.to_lowercase();
    let prompt = required(&blueprint.prompt, "prompt", index)?;
    let hint_mask = required(&blueprint.hint_mask, "hint_mask", index)?;
    let dev_answer = required(&blueprint.dev_answer, "dev_answer", index)?;
    let fragment_text = required(&blueprint.fragment_text, "fragment_text", index)?;

    let answer = normalize_answer(dev_answer);
    let salt = non_empty_or(&blueprint.salt, random_salt);

    let fragment = if blueprint.fragment_mode.as_deref() == Some("enc") {
        let passphrase = blueprint
            .dev_passphrase
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if passphrase.is_empty() {
            return Err(VaultsmithError::Validation(format!(
                "Missing dev_passphrase for encrypted fragment: {}",
                signal_id
            )));
        }
        envelope::encode(fragment_text, passphrase, iterations)?
    } else {
        fragment_text.to_string()
    };

    Ok(Signal {
        secret_payload: payload_line(&signal_id, &vault_value(&fragment)),
        title: non_empty_or(&blueprint.title, || format!("Signal Fragment {}", index + 1)),
        difficulty: blueprint.difficulty.filter(|d| *d != 0).unwrap_or(1),
        transmission_type: non_empty_or(&blueprint.transmission_type, || "RIDDLE".to_string()),
        hint_mask: hint_mask.to_string(),
        synchronicity_weight: blueprint.synchronicity_weight.filter(|w| *w != 0).unwrap_or(1),
        unlock_fragment: blueprint.unlock_fragment.clone().unwrap_or_default(),
        prompt: prompt.to_string(),
        answer_hash: answer_hash(&salt, &answer),
        salt,
        signal_id,
    })
}

/// Build publishable signals from blueprint entries, preserving order
pub fn build_signals(blueprints: &[Blueprint], iterations: u32) -> VaultsmithResult<Vec<Signal>> {
    let signals = blueprints
        .iter()
        .enumerate()
        .map(|(index, blueprint)| build_signal(blueprint, index, iterations))
        .collect::<VaultsmithResult<Vec<_>>>()?;

    tracing::info!(count = signals.len(), "built signals");
    Ok(signals)
}

/// Check a player's answer against a signal's salted hash
pub fn verify_answer(signal: &Signal, candidate: &str) -> bool {
    let answer = normalize_answer(candidate);
    if answer.is_empty() {
        return false;
    }
    answer_hash(&signal.salt, &answer) == signal.answer_hash.to_lowercase()
}

/// Look up a signal by id, ignoring case
pub fn find_signal<'a>(signals: &'a [Signal], signal_id: &str) -> VaultsmithResult<&'a Signal> {
    let wanted = signal_id.trim();
    signals
        .iter()
        .find(|s| s.signal_id.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| VaultsmithError::signal_not_found(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};

    use crate::crypto::envelope::decode;
    use crate::vault::{extract_vault, seal_block};

    fn blueprint(id: &str) -> Blueprint {
        Blueprint {
            signal_id: Some(id.to_string()),
            prompt: Some("What hums beneath the static?".to_string()),
            hint_mask: Some("E__O".to_string()),
            dev_answer: Some("  echo ".to_string()),
            fragment_text: Some("FRAGMENT 07\r\nThe relay is listening.".to_string()),
            ..Blueprint::default()
        }
    }

    fn payload_block(signal: &Signal) -> String {
        let (_, value) = signal.secret_payload.split_once("::").unwrap();
        String::from_utf8(STANDARD.decode(value).unwrap()).unwrap()
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_build_defaults() {
        let signals = build_signals(&[blueprint("S001")], 10).unwrap();
        let signal = &signals[0];

        assert_eq!(signal.signal_id, "s001");
        assert_eq!(signal.title, "Signal Fragment 1");
        assert_eq!(signal.difficulty, 1);
        assert_eq!(signal.transmission_type, "RIDDLE");
        assert_eq!(signal.synchronicity_weight, 1);
        assert_eq!(signal.unlock_fragment, "");
        assert_eq!(signal.salt.len(), ANSWER_SALT_BYTES * 2);
        assert!(signal.secret_payload.starts_with("s001::"));
    }

    #[test]
    fn test_answer_hash_uses_salt_and_normalized_answer() {
        let mut bp = blueprint("s1");
        bp.salt = Some("abc123".to_string());

        let signal = &build_signals(&[bp], 10).unwrap()[0];
        assert_eq!(signal.salt, "abc123");
        assert_eq!(signal.answer_hash, sha256_hex("abc123:ECHO"));
    }

    #[test]
    fn test_plain_fragment_is_vault_block() {
        let signal = &build_signals(&[blueprint("s1")], 10).unwrap()[0];
        let block = payload_block(signal);

        assert_eq!(block, seal_block("FRAGMENT 07\nThe relay is listening."));
        let vault = extract_vault(block.as_bytes()).unwrap();
        assert_eq!(vault.text, "FRAGMENT 07\nThe relay is listening.");
    }

    #[test]
    fn test_encrypted_fragment() {
        let mut bp = blueprint("s2");
        bp.fragment_mode = Some("enc".to_string());
        bp.dev_passphrase = Some(" relay ".to_string());

        let signal = &build_signals(&[bp], 10).unwrap()[0];
        let vault = extract_vault(payload_block(signal).as_bytes()).unwrap();

        assert!(vault.text.starts_with("enc:v1:"));
        assert_eq!(
            decode(&vault.text, "relay").unwrap(),
            "FRAGMENT 07\r\nThe relay is listening."
        );
    }

    #[test]
    fn test_encrypted_fragment_requires_passphrase() {
        let mut bp = blueprint("s3");
        bp.fragment_mode = Some("enc".to_string());
        bp.dev_passphrase = Some("   ".to_string());

        let err = build_signals(&[bp], 10).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("s3"));
    }

    #[test]
    fn test_missing_field_names_entry() {
        let mut bp = blueprint("s4");
        bp.hint_mask = Some(String::new());

        let err = build_signals(&[blueprint("ok"), bp], 10).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: blueprint #2: missing required field: hint_mask"
        );
    }

    #[test]
    fn test_dev_fields_not_published() {
        let signal = &build_signals(&[blueprint("s5")], 10).unwrap()[0];
        let json = serde_json::to_value(signal).unwrap();

        for field in ["dev_answer", "dev_passphrase", "fragment_text", "fragment_mode"] {
            assert!(json.get(field).is_none(), "{} leaked", field);
        }
    }

    #[test]
    fn test_verify_answer() {
        let signal = &build_signals(&[blueprint("s6")], 10).unwrap()[0];

        assert!(verify_answer(signal, "echo"));
        assert!(verify_answer(signal, "  ECHO\n"));
        assert!(!verify_answer(signal, "ECHOES"));
        assert!(!verify_answer(signal, "   "));
    }

    #[test]
    fn test_verify_answer_accepts_uppercase_hash() {
        let mut signal = build_signals(&[blueprint("s7")], 10).unwrap().remove(0);
        signal.answer_hash = signal.answer_hash.to_uppercase();
        assert!(verify_answer(&signal, "echo"));
    }

    #[test]
    fn test_find_signal() {
        let signals = build_signals(&[blueprint("A1"), blueprint("B2")], 10).unwrap();

        assert_eq!(find_signal(&signals, "b2").unwrap().signal_id, "b2");
        assert_eq!(find_signal(&signals, " A1 ").unwrap().signal_id, "a1");
        assert!(find_signal(&signals, "c3").unwrap_err().is_not_found());
    }

    #[test]
    fn test_load_blueprints() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("blueprint.json");
        std::fs::write(
            &path,
            r#"[{"signal_id":"S9","prompt":"p","hint_mask":"m","dev_answer":"a","fragment_text":"f","difficulty":4}]"#,
        )
        .unwrap();

        let blueprints = load_blueprints(&path).unwrap();
        assert_eq!(blueprints.len(), 1);
        assert_eq!(blueprints[0].difficulty, Some(4));

        std::fs::write(&path, r#"{"signal_id":"S9"}"#).unwrap();
        assert!(matches!(
            load_blueprints(&path).unwrap_err(),
            VaultsmithError::Json(_)
        ));
    }
}
