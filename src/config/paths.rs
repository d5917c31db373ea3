//! Path management for vaultsmith
//!
//! ## Path Resolution Order
//!
//! 1. `VAULTSMITH_HOME` environment variable (if set)
//! 2. The platform config directory reported by `directories`
//!    (`~/.config/vaultsmith` on Linux, `%APPDATA%\vaultsmith\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::VaultsmithError;

/// Environment variable overriding the base directory
pub const HOME_ENV_VAR: &str = "VAULTSMITH_HOME";

/// Manages all paths used by vaultsmith
#[derive(Debug, Clone)]
pub struct VaultsmithPaths {
    /// Base directory for all vaultsmith files
    base_dir: PathBuf,
}

impl VaultsmithPaths {
    /// Create a new VaultsmithPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, VaultsmithError> {
        let base_dir = if let Ok(custom) = std::env::var(HOME_ENV_VAR) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create VaultsmithPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), VaultsmithError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            VaultsmithError::Io(format!("Failed to create base directory: {}", e))
        })
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, VaultsmithError> {
    ProjectDirs::from("", "", "vaultsmith")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| VaultsmithError::Config("Could not determine home directory".into()))
}
