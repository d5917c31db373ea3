//! The `enc:v1` envelope codec
//!
//! An envelope is a self-describing, passphrase-protected string:
//!
//! ```text
//! enc:v1:<base64( {"v":1,"alg":"AES-GCM","iter":N,"salt":B64,"iv":B64,"ct":B64} )>
//! ```
//!
//! The key is PBKDF2-HMAC-SHA256(passphrase, salt, iter) and `ct` is the
//! AES-256-GCM ciphertext with its tag appended. The JSON is compact and its
//! fields appear in exactly the order above, so any producer that follows the
//! same recipe is byte-compatible apart from the random salt and nonce.
//!
//! Decoding also accepts the legacy record written by early tooling, which
//! omitted `alg` and `iter`, and a body holding raw JSON instead of base64.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{VaultsmithError, VaultsmithResult};

use super::encryption::{self, NONCE_SIZE, TAG_SIZE};
use super::key_derivation::{derive_key, generate_salt, SALT_SIZE};

/// Literal prefix of every envelope
pub const PREFIX: &str = "enc:v1:";

/// PBKDF2 rounds used when the caller does not choose
pub const DEFAULT_ITERATIONS: u32 = 120_000;

/// Envelope format revisions understood by this codec
///
/// A new wire layout must add a variant and bump `v`; decoding matches on
/// this enum rather than inferring the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    V1,
}

impl FormatVersion {
    /// The revision written by [`encode`]
    pub const CURRENT: FormatVersion = FormatVersion::V1;

    /// The numeric `v` tag
    pub fn number(self) -> u64 {
        match self {
            FormatVersion::V1 => 1,
        }
    }

    /// Map a `v` tag back to a known revision
    pub fn from_number(v: u64) -> Option<Self> {
        match v {
            1 => Some(FormatVersion::V1),
            _ => None,
        }
    }
}

/// Authenticated cipher identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    AesGcm,
}

impl Algorithm {
    /// The `alg` string written to the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::AesGcm => "AES-GCM",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "AES-GCM" => Some(Algorithm::AesGcm),
            _ => None,
        }
    }
}

/// Check whether a string carries the `enc:v1:` prefix
pub fn is_encrypted_fragment(s: &str) -> bool {
    s.starts_with(PREFIX)
}

/// Record written to the wire. Field order is part of the format.
#[derive(Serialize)]
struct WireRecord<'a> {
    v: u64,
    alg: &'a str,
    iter: u32,
    salt: String,
    iv: String,
    ct: String,
}

/// Record as read from the wire, before validation
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecord {
    v: Option<u64>,
    #[serde(default)]
    alg: Option<String>,
    #[serde(default)]
    iter: Option<u64>,
    #[serde(default)]
    salt: Option<String>,
    #[serde(default)]
    iv: Option<String>,
    #[serde(default)]
    ct: Option<String>,
}

/// A parsed, structurally valid envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub version: FormatVersion,
    pub algorithm: Algorithm,
    pub iterations: u32,
    pub salt: [u8; SALT_SIZE],
    pub iv: [u8; NONCE_SIZE],
    /// Ciphertext with the GCM tag appended
    pub ciphertext: Vec<u8>,
}

/// Non-secret facts about an envelope, readable without the passphrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeHeader {
    pub version: u64,
    pub algorithm: &'static str,
    pub iterations: u32,
    pub salt_len: usize,
    pub iv_len: usize,
    pub ciphertext_len: usize,
    /// Length of the sealed plaintext in bytes
    pub plaintext_len: usize,
}

impl Envelope {
    /// Encrypt `plaintext` under a key derived from `passphrase`
    ///
    /// The iteration count is checked before any randomness is drawn.
    pub fn seal(plaintext: &str, passphrase: &str, iterations: u32) -> VaultsmithResult<Self> {
        if iterations == 0 {
            return Err(VaultsmithError::Validation(
                "iteration count must be at least 1".to_string(),
            ));
        }

        let salt = generate_salt();
        let key = derive_key(passphrase, &salt, iterations)?;
        let sealed = encryption::seal(plaintext.as_bytes(), &key)?;

        Ok(Self {
            version: FormatVersion::CURRENT,
            algorithm: Algorithm::AesGcm,
            iterations,
            salt,
            iv: sealed.iv,
            ciphertext: sealed.ciphertext,
        })
    }

    /// Decrypt the envelope, verifying its tag
    pub fn open(&self, passphrase: &str) -> VaultsmithResult<String> {
        let key = derive_key(passphrase, &self.salt, self.iterations)?;
        let plaintext = encryption::open(&self.iv, &self.ciphertext, &key)?;

        String::from_utf8(plaintext)
            .map_err(|_| VaultsmithError::format("decrypted payload is not valid UTF-8"))
    }

    /// Serialize to the `enc:v1:` transport string
    pub fn to_wire(&self) -> VaultsmithResult<String> {
        let record = WireRecord {
            v: self.version.number(),
            alg: self.algorithm.as_str(),
            iter: self.iterations,
            salt: STANDARD.encode(self.salt),
            iv: STANDARD.encode(self.iv),
            ct: STANDARD.encode(&self.ciphertext),
        };
        let json = serde_json::to_string(&record)?;

        Ok(format!("{}{}", PREFIX, STANDARD.encode(json.as_bytes())))
    }

    /// Parse and validate a transport string without decrypting it
    pub fn parse(envelope: &str) -> VaultsmithResult<Self> {
        let body = envelope
            .strip_prefix(PREFIX)
            .ok_or_else(|| VaultsmithError::format("missing enc:v1: prefix"))?
            .trim();

        if body.is_empty() {
            return Err(VaultsmithError::format("empty envelope body"));
        }

        let raw = parse_body(body)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawRecord) -> VaultsmithResult<Self> {
        let v = raw
            .v
            .ok_or_else(|| VaultsmithError::format("missing version field"))?;
        let version = FormatVersion::from_number(v)
            .ok_or_else(|| VaultsmithError::format(format!("unsupported version {}", v)))?;

        let algorithm = match raw.alg.as_deref() {
            None => Algorithm::AesGcm,
            Some(alg) => Algorithm::parse(alg).ok_or_else(|| {
                VaultsmithError::format(format!("unsupported algorithm {:?}", alg))
            })?,
        };

        let iterations = match raw.iter {
            None => DEFAULT_ITERATIONS,
            Some(0) => return Err(VaultsmithError::format("iteration count must be at least 1")),
            Some(n) => u32::try_from(n).map_err(|_| {
                VaultsmithError::format(format!("iteration count {} out of range", n))
            })?,
        };

        let salt: [u8; SALT_SIZE] = decode_fixed("salt", raw.salt)?;
        let iv: [u8; NONCE_SIZE] = decode_fixed("iv", raw.iv)?;
        let ciphertext = decode_field("ct", raw.ct)?;

        if ciphertext.len() < TAG_SIZE {
            return Err(VaultsmithError::format(format!(
                "ciphertext is {} bytes, shorter than the {}-byte tag",
                ciphertext.len(),
                TAG_SIZE
            )));
        }

        Ok(Self {
            version,
            algorithm,
            iterations,
            salt,
            iv,
            ciphertext,
        })
    }

    /// Describe the envelope without decrypting it
    pub fn header(&self) -> EnvelopeHeader {
        EnvelopeHeader {
            version: self.version.number(),
            algorithm: self.algorithm.as_str(),
            iterations: self.iterations,
            salt_len: self.salt.len(),
            iv_len: self.iv.len(),
            ciphertext_len: self.ciphertext.len(),
            plaintext_len: self.ciphertext.len().saturating_sub(TAG_SIZE),
        }
    }
}

/// Body is base64(JSON); fall back to raw JSON for legacy producers
fn parse_body(body: &str) -> VaultsmithResult<RawRecord> {
    if let Ok(bytes) = STANDARD.decode(body) {
        if let Some(raw) = parse_record(&bytes) {
            return Ok(raw);
        }
    }

    parse_record(body.as_bytes())
        .ok_or_else(|| VaultsmithError::format("envelope body is neither base64 JSON nor JSON"))
}

/// The record must span the whole body. serde_json tolerates whitespace
/// around the object, which a flipped padding character can introduce.
fn parse_record(bytes: &[u8]) -> Option<RawRecord> {
    if !bytes.starts_with(b"{") || !bytes.ends_with(b"}") {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}

fn decode_field(name: &str, value: Option<String>) -> VaultsmithResult<Vec<u8>> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| VaultsmithError::format(format!("missing {} field", name)))?;

    STANDARD
        .decode(value.trim())
        .map_err(|e| VaultsmithError::format(format!("invalid base64 in {}: {}", name, e)))
}

fn decode_fixed<const N: usize>(name: &str, value: Option<String>) -> VaultsmithResult<[u8; N]> {
    let bytes = decode_field(name, value)?;
    let len = bytes.len();

    bytes.try_into().map_err(|_| {
        VaultsmithError::format(format!("{} must be {} bytes, got {}", name, N, len))
    })
}

/// Encode `plaintext` into an `enc:v1:` envelope
pub fn encode(plaintext: &str, passphrase: &str, iterations: u32) -> VaultsmithResult<String> {
    Envelope::seal(plaintext, passphrase, iterations)?.to_wire()
}

/// Encode with [`DEFAULT_ITERATIONS`]
pub fn encode_default(plaintext: &str, passphrase: &str) -> VaultsmithResult<String> {
    encode(plaintext, passphrase, DEFAULT_ITERATIONS)
}

/// Decode an `enc:v1:` envelope back into its plaintext
///
/// Fails with [`VaultsmithError::Format`] for anything that is not a
/// well-formed v1 envelope and with [`VaultsmithError::Authentication`] when
/// the tag does not verify.
pub fn decode(envelope: &str, passphrase: &str) -> VaultsmithResult<String> {
    let parsed = Envelope::parse(envelope)?;
    tracing::debug!(iterations = parsed.iterations, "decoding envelope");
    parsed.open(passphrase)
}

/// Read an envelope's header fields without the passphrase
pub fn inspect(envelope: &str) -> VaultsmithResult<EnvelopeHeader> {
    Envelope::parse(envelope).map(|e| e.header())
}
