//! Caesar shift used by the handshake puzzle

const ALPHABET_LEN: u8 = 26;

/// Upper-case `text` and shift every A-Z letter forward by `shift`
///
/// Anything outside A-Z after upper-casing is passed through unchanged.
pub fn caesar_encrypt(text: &str, shift: u8) -> String {
    let shift = shift % ALPHABET_LEN;

    text.to_uppercase()
        .chars()
        .map(|ch| {
            if ch.is_ascii_uppercase() {
                let offset = (ch as u8 - b'A' + shift) % ALPHABET_LEN;
                (b'A' + offset) as char
            } else {
                ch
            }
        })
        .collect()
}
