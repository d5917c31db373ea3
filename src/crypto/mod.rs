//! Cryptographic functions for vaultsmith
//!
//! Provides the `enc:v1` envelope: PBKDF2-HMAC-SHA256 key derivation and
//! AES-256-GCM authenticated encryption, serialized as a prefixed base64 JSON
//! record.

pub mod encryption;
pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{open, seal, SealedBox};
pub use envelope::{
    decode, encode, encode_default, inspect, is_encrypted_fragment, Envelope, EnvelopeHeader,
    FormatVersion, DEFAULT_ITERATIONS, PREFIX,
};
pub use key_derivation::{derive_key, DerivedKey};
pub use secure_memory::SecureString;
