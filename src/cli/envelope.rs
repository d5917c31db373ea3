//! Envelope CLI commands
//!
//! Encrypt, decrypt and inspect `enc:v1` envelopes from the command line.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::Settings;
use crate::crypto::{self, SecureString};
use crate::error::{VaultsmithError, VaultsmithResult};

/// Envelope subcommands
#[derive(Subcommand)]
pub enum EnvelopeCommands {
    /// Encrypt text into an enc:v1 envelope
    Encrypt {
        /// Text to encrypt (reads stdin when neither TEXT nor --file is given)
        text: Option<String>,
        /// Read the plaintext from a file instead
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Passphrase (prompted for when absent)
        #[arg(short, long, env = "VAULTSMITH_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
        /// PBKDF2 rounds (defaults to the configured value)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        iterations: Option<u32>,
    },

    /// Decrypt an enc:v1 envelope
    Decrypt {
        /// Envelope string (reads stdin when neither ENVELOPE nor --file is given)
        envelope: Option<String>,
        /// Read the envelope from a file instead
        #[arg(short, long, conflicts_with = "envelope")]
        file: Option<PathBuf>,
        /// Passphrase (prompted for when absent)
        #[arg(short, long, env = "VAULTSMITH_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
    },

    /// Show an envelope's header without decrypting it
    Inspect {
        /// Envelope string (reads stdin when neither ENVELOPE nor --file is given)
        envelope: Option<String>,
        /// Read the envelope from a file instead
        #[arg(short, long, conflicts_with = "envelope")]
        file: Option<PathBuf>,
    },
}

/// Handle an envelope command
pub fn handle_envelope_command(settings: &Settings, cmd: EnvelopeCommands) -> VaultsmithResult<()> {
    match cmd {
        EnvelopeCommands::Encrypt {
            text,
            file,
            passphrase,
            iterations,
        } => {
            let plaintext = read_input(text, file.as_deref())?;
            let passphrase = resolve_passphrase(passphrase, true)?;
            let iterations = iterations.unwrap_or(settings.iterations);

            let envelope = crypto::encode(&plaintext, &passphrase, iterations)?;
            println!("{}", envelope);
        }

        EnvelopeCommands::Decrypt {
            envelope,
            file,
            passphrase,
        } => {
            let envelope = read_input(envelope, file.as_deref())?;
            // Fail on format before asking for a passphrase
            let parsed = crypto::Envelope::parse(envelope.trim())?;
            let passphrase = resolve_passphrase(passphrase, false)?;

            tracing::debug!(iterations = parsed.iterations, "decoding envelope");
            let plaintext = parsed.open(&passphrase)?;
            println!("{}", plaintext);
        }

        EnvelopeCommands::Inspect { envelope, file } => {
            let envelope = read_input(envelope, file.as_deref())?;
            let header = crypto::inspect(envelope.trim())?;

            println!("Envelope");
            println!("========");
            println!("Version:     {}", header.version);
            println!("Algorithm:   {}", header.algorithm);
            println!("Iterations:  {}", header.iterations);
            println!("Salt:        {} bytes", header.salt_len);
            println!("IV:          {} bytes", header.iv_len);
            println!(
                "Ciphertext:  {} bytes ({} plaintext + 16 tag)",
                header.ciphertext_len, header.plaintext_len
            );
        }
    }

    Ok(())
}

/// Take input from an argument, a file or stdin, in that order
pub(crate) fn read_input(arg: Option<String>, file: Option<&Path>) -> VaultsmithResult<String> {
    if let Some(arg) = arg {
        return Ok(arg);
    }

    if let Some(path) = file {
        return std::fs::read_to_string(path).map_err(|e| {
            VaultsmithError::Io(format!("Failed to read {}: {}", path.display(), e))
        });
    }

    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Use the given passphrase or prompt for one
///
/// When `confirm` is set the prompt asks twice and the entries must match.
pub(crate) fn resolve_passphrase(
    given: Option<String>,
    confirm: bool,
) -> VaultsmithResult<SecureString> {
    let passphrase = match given {
        Some(p) => SecureString::new(p),
        None => {
            let first = prompt_passphrase("Passphrase: ")?;
            if confirm {
                let second = prompt_passphrase("Confirm passphrase: ")?;
                if first.as_str() != second.as_str() {
                    return Err(VaultsmithError::Validation(
                        "Passphrases do not match".to_string(),
                    ));
                }
            }
            first
        }
    };

    if passphrase.is_empty() {
        tracing::warn!("empty passphrase; the envelope offers no real protection");
    }

    Ok(passphrase)
}

/// Prompt for a passphrase (hidden input)
fn prompt_passphrase(prompt: &str) -> VaultsmithResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::new)
        .map_err(|e| VaultsmithError::Io(format!("Failed to read passphrase: {}", e)))
}
