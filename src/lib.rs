//! vaultsmith - offline content tools for the Ghost Signal puzzle vault
//!
//! This library provides the content pipeline behind the `vaultsmith`
//! binary: the `enc:v1` envelope codec, image vault carriers, and the
//! puzzle document generators.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `crypto`: PBKDF2 + AES-256-GCM envelopes
//! - `vault`: Hiding vault text after image data
//! - `puzzles`: Puzzle catalog, blueprint builder, answer verification
//! - `export`: JSON output
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust
//! use vaultsmith::crypto::{decode, encode};
//!
//! let envelope = encode("The server clock is lying.", "SPECTER", 1_000)?;
//! assert!(envelope.starts_with("enc:v1:"));
//! assert_eq!(decode(&envelope, "SPECTER")?, "The server clock is lying.");
//! # Ok::<(), vaultsmith::VaultsmithError>(())
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod export;
pub mod puzzles;
pub mod vault;

pub use error::{VaultsmithError, VaultsmithResult};
