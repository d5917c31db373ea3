//! Puzzle content generation
//!
//! Two generators live here: the fixed three-puzzle catalog that ships with
//! the game, and the blueprint builder that turns authoring files into
//! hashed, vault-wrapped signals.

pub mod blueprint;
pub mod caesar;
pub mod catalog;
pub mod model;

pub use blueprint::{
    build_signals, find_signal, load_blueprints, normalize_answer, sha256_hex, verify_answer,
    Blueprint, Signal,
};
pub use caesar::caesar_encrypt;
pub use catalog::default_catalog;
pub use model::{payload_line, Puzzle, PuzzleKind};
