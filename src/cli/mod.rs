//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the library modules.

pub mod envelope;
pub mod puzzles;
pub mod vault;

pub use envelope::{handle_envelope_command, EnvelopeCommands};
pub use puzzles::{handle_puzzle_command, PuzzleCommands};
pub use vault::{handle_vault_command, VaultCommands};
