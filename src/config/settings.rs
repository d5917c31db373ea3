//! User settings for vaultsmith
//!
//! Holds the generator defaults: PBKDF2 cost for new envelopes and the
//! parameters of the fixed puzzle catalog.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::paths::VaultsmithPaths;
use crate::crypto::envelope::DEFAULT_ITERATIONS;
use crate::error::VaultsmithError;

/// Settings for vaultsmith
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// PBKDF2 rounds used for new envelopes
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Shift applied by the Caesar handshake puzzle
    #[serde(default = "default_caesar_shift")]
    pub caesar_shift: u8,

    /// Passphrase protecting the AES puzzle payload
    ///
    /// This is also the answer to the handshake puzzle, so players recover
    /// it before they reach the encrypted fragment.
    #[serde(default = "default_aes_puzzle_passphrase")]
    pub aes_puzzle_passphrase: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_caesar_shift() -> u8 {
    7
}

fn default_aes_puzzle_passphrase() -> String {
    "SPECTER".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            iterations: default_iterations(),
            caesar_shift: default_caesar_shift(),
            aes_puzzle_passphrase: default_aes_puzzle_passphrase(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &VaultsmithPaths) -> Result<Self, VaultsmithError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            Self::load_from(&settings_path)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, VaultsmithError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VaultsmithError::Io(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            VaultsmithError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.validate()?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Reject settings no generator could honor
    pub fn validate(&self) -> Result<(), VaultsmithError> {
        if self.iterations == 0 {
            return Err(VaultsmithError::Config(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.caesar_shift >= 26 {
            return Err(VaultsmithError::Config(format!(
                "caesar_shift must be between 0 and 25, got {}",
                self.caesar_shift
            )));
        }
        if self.aes_puzzle_passphrase.is_empty() {
            return Err(VaultsmithError::Config(
                "aes_puzzle_passphrase must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VaultsmithPaths) -> Result<(), VaultsmithError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            VaultsmithError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            VaultsmithError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
