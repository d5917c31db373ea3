//! The fixed puzzle catalog shipped with the game

use base64::{engine::general_purpose::STANDARD, Engine};

use super::caesar::caesar_encrypt;
use super::model::{payload_line, Puzzle, PuzzleKind};
use crate::config::Settings;
use crate::crypto::envelope;
use crate::error::VaultsmithResult;

const HANDSHAKE_ANSWER: &str = "SPECTER";
const HANDSHAKE_PAYLOAD: &str = "HANDSHAKE CONFIRMED. Key recovered: SPECTER";

const STATIC_ANSWER: &str = "ECHO";
const STATIC_PAYLOAD: &str = "STATIC CLEARED. The noise whispered: ECHO";

const BREACH_ANSWER: &str = "DECRYPT";
const BREACH_FRAGMENT: &str = "MASTER MANIFEST • FRAGMENT 03\nThe server clock is lying.";

/// Build the three catalog puzzles
///
/// The deep breach payload is freshly encrypted on every call, so two
/// catalogs never share a salt or nonce.
pub fn default_catalog(settings: &Settings) -> VaultsmithResult<Vec<Puzzle>> {
    settings.validate()?;

    let shift = settings.caesar_shift;
    let handshake_cipher = caesar_encrypt(HANDSHAKE_ANSWER, shift);

    let breach_envelope = envelope::encode(
        BREACH_FRAGMENT,
        &settings.aes_puzzle_passphrase,
        settings.iterations,
    )?;

    Ok(vec![
        Puzzle {
            id: "p1".to_string(),
            title: "The Handshake".to_string(),
            difficulty: 1,
            kind: PuzzleKind::Caesar,
            prompt: format!(
                "Decrypt the handshake. Caesar shift = {}. Ciphertext: {}",
                shift, handshake_cipher
            ),
            answer: HANDSHAKE_ANSWER.to_string(),
            secret_payload: payload_line("p1", &STANDARD.encode(HANDSHAKE_PAYLOAD)),
        },
        Puzzle {
            id: "p2".to_string(),
            title: "The Static".to_string(),
            difficulty: 2,
            kind: PuzzleKind::CssNoise,
            prompt: "The answer is hidden in the terminal\u{2019}s CSS noise. \
                     Look for the ghost word in the noise layer."
                .to_string(),
            answer: STATIC_ANSWER.to_string(),
            secret_payload: payload_line("p2", &STANDARD.encode(STATIC_PAYLOAD)),
        },
        Puzzle {
            id: "p3".to_string(),
            title: "The Deep Breach".to_string(),
            difficulty: 3,
            kind: PuzzleKind::Aes,
            prompt: "Decrypt the payload. The key was recovered earlier. \
                     Paste the fragment into the terminal and decrypt."
                .to_string(),
            answer: BREACH_ANSWER.to_string(),
            secret_payload: payload_line("p3", &breach_envelope),
        },
    ])
}
