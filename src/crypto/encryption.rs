//! AES-256-GCM encryption/decryption
//!
//! Each sealing operation draws a fresh 96-bit nonce. No additional
//! authenticated data is used; the 16-byte tag is appended to the ciphertext.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::{VaultsmithError, VaultsmithResult};

use super::DerivedKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Ciphertext together with the nonce it was sealed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBox {
    pub iv: [u8; NONCE_SIZE],
    /// Ciphertext with the authentication tag appended
    pub ciphertext: Vec<u8>,
}

/// Generate a fresh random nonce from the OS CSPRNG
pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

fn cipher_for(key: &DerivedKey) -> VaultsmithResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultsmithError::Encryption(format!("Failed to create cipher: {}", e)))
}

/// Encrypt plaintext with a fresh random nonce
pub fn seal(plaintext: &[u8], key: &DerivedKey) -> VaultsmithResult<SealedBox> {
    seal_with_nonce(plaintext, key, generate_nonce())
}

/// Encrypt plaintext under a caller-chosen nonce
///
/// Reusing a nonce with the same key breaks GCM; only [`seal`] should be
/// used outside of known-answer tests.
pub(crate) fn seal_with_nonce(
    plaintext: &[u8],
    key: &DerivedKey,
    iv: [u8; NONCE_SIZE],
) -> VaultsmithResult<SealedBox> {
    let cipher = cipher_for(key)?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|e| VaultsmithError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok(SealedBox { iv, ciphertext })
}

/// Decrypt and verify ciphertext
///
/// Any tag mismatch is reported as [`VaultsmithError::Authentication`] and no
/// plaintext is released.
pub fn open(iv: &[u8], ciphertext: &[u8], key: &DerivedKey) -> VaultsmithResult<Vec<u8>> {
    if iv.len() != NONCE_SIZE {
        return Err(VaultsmithError::format(format!(
            "Invalid nonce size: expected {}, got {}",
            NONCE_SIZE,
            iv.len()
        )));
    }
    if ciphertext.len() < TAG_SIZE {
        return Err(VaultsmithError::format(format!(
            "Ciphertext too short: {} bytes, tag alone is {}",
            ciphertext.len(),
            TAG_SIZE
        )));
    }

    let cipher = cipher_for(key)?;

    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| VaultsmithError::Authentication)
}
