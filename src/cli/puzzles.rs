//! Puzzle CLI commands
//!
//! Generates the puzzle catalog and builds signals from blueprints.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::error::{VaultsmithError, VaultsmithResult};
use crate::export::write_pretty_json;
use crate::puzzles::{self, Signal};

/// Puzzle subcommands
#[derive(Subcommand)]
pub enum PuzzleCommands {
    /// Emit the three built-in puzzles as JSON
    Generate {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Build publishable signals from a blueprint file
    Build {
        /// Blueprint JSON array
        blueprint: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Check an answer against a built signal file
    Verify {
        /// Built signals JSON (output of `puzzles build`)
        signals: PathBuf,
        /// Signal id (case-insensitive)
        signal_id: String,
        /// Candidate answer
        answer: String,
    },
}

/// Handle a puzzle command
pub fn handle_puzzle_command(settings: &Settings, cmd: PuzzleCommands) -> VaultsmithResult<()> {
    match cmd {
        PuzzleCommands::Generate { out } => {
            let catalog = puzzles::default_catalog(settings)?;
            write_pretty_json(&catalog, out.as_deref())?;
            if let Some(path) = out {
                eprintln!("Wrote {} puzzles to {}", catalog.len(), path.display());
            }
        }

        PuzzleCommands::Build { blueprint, out } => {
            let blueprints = puzzles::load_blueprints(&blueprint)?;
            let signals = puzzles::build_signals(&blueprints, settings.iterations)?;
            write_pretty_json(&signals, out.as_deref())?;
            if let Some(path) = out {
                eprintln!("Built {} puzzles -> {}", signals.len(), path.display());
            }
        }

        PuzzleCommands::Verify {
            signals,
            signal_id,
            answer,
        } => {
            let contents = std::fs::read_to_string(&signals).map_err(|e| {
                VaultsmithError::Io(format!("Failed to read {}: {}", signals.display(), e))
            })?;
            let built: Vec<Signal> = serde_json::from_str(&contents)?;
            let signal = puzzles::find_signal(&built, &signal_id)?;

            if !puzzles::verify_answer(signal, &answer) {
                return Err(VaultsmithError::Validation(format!(
                    "Answer rejected for signal {}",
                    signal.signal_id
                )));
            }
            println!("Answer accepted for signal {}", signal.signal_id);
        }
    }

    Ok(())
}
