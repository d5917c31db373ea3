//! Puzzle records

use serde::{Deserialize, Serialize};

/// How a puzzle is presented and solved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PuzzleKind {
    /// Shift-cipher ciphertext in the prompt
    Caesar,
    /// Answer hidden in the terminal's CSS noise layer
    CssNoise,
    /// Payload is an `enc:v1` envelope
    Aes,
}

/// A puzzle as written to the puzzle document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub title: String,
    pub difficulty: u8,
    #[serde(rename = "type")]
    pub kind: PuzzleKind,
    pub prompt: String,
    pub answer: String,
    /// `<id>::<value>` line unlocked in the vault when the puzzle is solved
    pub secret_payload: String,
}

/// Format a vault entry line
pub fn payload_line(key: &str, value: &str) -> String {
    format!("{}::{}", key, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(serde_json::to_string(&PuzzleKind::Caesar).unwrap(), r#""caesar""#);
        assert_eq!(serde_json::to_string(&PuzzleKind::CssNoise).unwrap(), r#""css-noise""#);
        assert_eq!(serde_json::to_string(&PuzzleKind::Aes).unwrap(), r#""aes""#);
    }

    #[test]
    fn test_puzzle_serializes_type_key() {
        let puzzle = Puzzle {
            id: "p9".into(),
            title: "Test".into(),
            difficulty: 1,
            kind: PuzzleKind::Aes,
            prompt: "?".into(),
            answer: "A".into(),
            secret_payload: payload_line("p9", "x"),
        };

        let json = serde_json::to_value(&puzzle).unwrap();
        assert_eq!(json["type"], "aes");
        assert_eq!(json["secret_payload"], "p9::x");
        assert!(json.get("kind").is_none());
    }
}
