//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Stretches a passphrase into the 32-byte AES-256 key used by `enc:v1`
//! envelopes. The salt travels with the envelope; the key never does.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultsmithError, VaultsmithResult};

/// Length of the derived AES-256 key in bytes
pub const KEY_SIZE: usize = 32;

/// Length of the per-envelope PBKDF2 salt in bytes
pub const SALT_SIZE: usize = 16;

/// A derived encryption key, wiped from memory on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Wrap raw key material
    pub fn from_bytes(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Generate a fresh random salt from the OS CSPRNG
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive an encryption key from a passphrase
///
/// The passphrase is used as its raw UTF-8 bytes, without trimming or case
/// folding.
pub fn derive_key(passphrase: &str, salt: &[u8], iterations: u32) -> VaultsmithResult<DerivedKey> {
    if iterations == 0 {
        return Err(VaultsmithError::Validation(
            "PBKDF2 iteration count must be at least 1".to_string(),
        ));
    }

    tracing::debug!(iterations, salt_len = salt.len(), "deriving key");

    let mut key = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations, &mut key);

    let derived = DerivedKey::from_bytes(key);
    key.zeroize();
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        // PBKDF2-HMAC-SHA256("password", "salt", 1, 32)
        let key = derive_key("password", b"salt", 1).unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }

    #[test]
    fn test_same_inputs_same_key() {
        let salt = generate_salt();
        let key1 = derive_key("test_passphrase", &salt, 100).unwrap();
        let key2 = derive_key("test_passphrase", &salt, 100).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_passphrase_different_key() {
        let salt = generate_salt();
        let key1 = derive_key("passphrase1", &salt, 100).unwrap();
        let key2 = derive_key("passphrase2", &salt, 100).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("same_passphrase", &generate_salt(), 100).unwrap();
        let key2 = derive_key("same_passphrase", &generate_salt(), 100).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_iterations_different_key() {
        let salt = generate_salt();
        let key1 = derive_key("same_passphrase", &salt, 100).unwrap();
        let key2 = derive_key("same_passphrase", &salt, 101).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = derive_key("pass", &generate_salt(), 0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_salts_are_unique() {
        let salts: std::collections::HashSet<[u8; SALT_SIZE]> =
            (0..64).map(|_| generate_salt()).collect();
        assert_eq!(salts.len(), 64);
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = DerivedKey::from_bytes([0xAB; KEY_SIZE]);
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("171"));
    }
}
