//! Configuration module for vaultsmith
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - Persisted generator settings (KDF cost, puzzle parameters)

pub mod paths;
pub mod settings;

pub use paths::VaultsmithPaths;
pub use settings::Settings;
