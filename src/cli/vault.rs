//! Vault CLI commands
//!
//! Hide vault text in carrier images and read it back.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

use super::envelope::resolve_passphrase;
use crate::config::Settings;
use crate::crypto;
use crate::error::{VaultsmithError, VaultsmithResult};
use crate::export::export_json;
use crate::vault::{self, ExtractedVault};

/// Vault subcommands
#[derive(Subcommand)]
pub enum VaultCommands {
    /// Concatenate an image and a vault file (newline separated)
    Append {
        /// Carrier image
        image: PathBuf,
        /// Vault text file
        vault: PathBuf,
        /// Output image
        output: PathBuf,
    },

    /// Fence a single payload line between vault markers after an image
    Embed {
        /// Carrier image
        image: PathBuf,
        /// Payload line, e.g. "p3::enc:v1:..."
        payload: String,
        /// Output image
        output: PathBuf,
    },

    /// Print the base64 vault value for a fragment
    Seal {
        /// Fragment text
        text: String,
        /// Encrypt the fragment into an enc:v1 envelope first
        #[arg(short, long)]
        encrypt: bool,
        /// Passphrase for --encrypt (prompted for when absent)
        #[arg(short, long, env = "VAULTSMITH_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
    },

    /// Read the vault hidden in an image
    Extract {
        /// Carrier image
        image: PathBuf,
        /// Print the vault and its parsed entries as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct ExtractReport<'a> {
    #[serde(flatten)]
    vault: &'a ExtractedVault,
    entries: BTreeMap<String, String>,
}

/// Handle a vault command
pub fn handle_vault_command(settings: &Settings, cmd: VaultCommands) -> VaultsmithResult<()> {
    match cmd {
        VaultCommands::Append {
            image,
            vault: vault_file,
            output,
        } => {
            let written = vault::append_vault(&image, &vault_file, &output)?;
            println!("Wrote: {} ({} bytes)", output.display(), written);
        }

        VaultCommands::Embed {
            image,
            payload,
            output,
        } => {
            let image_bytes = fs::read(&image).map_err(|e| {
                VaultsmithError::Io(format!("Failed to read {}: {}", image.display(), e))
            })?;
            let carrier = vault::embed_payload(&image_bytes, &payload)?;
            fs::write(&output, &carrier).map_err(|e| {
                VaultsmithError::Io(format!("Failed to write {}: {}", output.display(), e))
            })?;
            println!("Wrote: {} ({} bytes)", output.display(), carrier.len());
        }

        VaultCommands::Seal {
            text,
            encrypt,
            passphrase,
        } => {
            let fragment = if encrypt {
                let passphrase = resolve_passphrase(passphrase, true)?;
                crypto::encode(&text, &passphrase, settings.iterations)?
            } else {
                text
            };
            println!("{}", vault::vault_value(&fragment));
        }

        VaultCommands::Extract { image, json } => {
            let bytes = fs::read(&image).map_err(|e| {
                VaultsmithError::Io(format!("Failed to read {}: {}", image.display(), e))
            })?;
            let extracted = vault::extract_vault(&bytes)?;

            if json {
                let report = ExtractReport {
                    vault: &extracted,
                    entries: vault::parse_entries(&extracted.text),
                };
                export_json(&report, &mut std::io::stdout().lock())?;
            } else {
                println!("{}", extracted.text);
                if let Some(deep) = &extracted.deep_layer {
                    eprintln!("Deep layer detected ({} bytes)", deep.len());
                }
            }
        }
    }

    Ok(())
}
