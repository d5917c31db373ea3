use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use vaultsmith::cli::{
    handle_envelope_command, handle_puzzle_command, handle_vault_command, EnvelopeCommands,
    PuzzleCommands, VaultCommands,
};
use vaultsmith::config::{paths::VaultsmithPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "vaultsmith",
    version,
    about = "Offline content tools for the Ghost Signal puzzle vault",
    long_about = "vaultsmith builds the content the Ghost Signal front-end consumes: \
                  enc:v1 envelopes (PBKDF2-HMAC-SHA256 + AES-256-GCM), vault text \
                  hidden after image data, and the puzzle documents."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use this settings file instead of the one in the config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Envelope(EnvelopeCommands),

    /// Image vault commands
    #[command(subcommand)]
    Vault(VaultCommands),

    /// Puzzle document commands
    #[command(subcommand, alias = "puzzle")]
    Puzzles(PuzzleCommands),

    /// Show current configuration and paths
    Config {
        /// Write the effective settings to the config directory
        #[arg(long)]
        init: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = VaultsmithPaths::new()?;
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::load_or_create(&paths)?,
    };

    match cli.command {
        Some(Commands::Envelope(cmd)) => handle_envelope_command(&settings, cmd)?,
        Some(Commands::Vault(cmd)) => handle_vault_command(&settings, cmd)?,
        Some(Commands::Puzzles(cmd)) => handle_puzzle_command(&settings, cmd)?,
        Some(Commands::Config { init }) => {
            if init {
                settings.save(&paths)?;
                println!("Settings written to {}", paths.settings_file().display());
                println!();
            }

            println!("vaultsmith Configuration");
            println!("========================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            if let Some(path) = &cli.config {
                println!("Override file:    {}", path.display());
            }
            println!();
            println!("Settings:");
            println!("  PBKDF2 iterations:  {}", settings.iterations);
            println!("  Caesar shift:       {}", settings.caesar_shift);
            println!(
                "  AES puzzle key:     {} chars",
                settings.aes_puzzle_passphrase.chars().count()
            );
        }
        None => {
            println!("vaultsmith - Ghost Signal content tools");
            println!();
            println!("Run 'vaultsmith --help' for usage information.");
        }
    }

    Ok(())
}
