//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::MasterSecret;
use crate::envelope::Envelope;
use crate::errors::{KeySealError, Result};

/// KeySeal CLI: envelope encryption for private keys.
#[derive(Parser)]
#[command(
    name = "keyseal",
    about = "Envelope encryption for private keys",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory containing .keyseal.toml (default: current directory)
    #[arg(long, global = true, env = "KEYSEAL_CONFIG_DIR", default_value = ".")]
    pub config: String,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Seal a secret read from a file, stdin or --hex
    Seal {
        /// File to read the secret from (stdin if omitted)
        #[arg(short, long, conflicts_with = "hex")]
        input: Option<String>,

        /// Secret given as hex (0x prefix optional)
        #[arg(long)]
        hex: Option<String>,
    },

    /// Generate a random private key and print its sealed record
    Generate,

    /// Open an envelope and verify it decrypts
    Open {
        /// Envelope JSON file (stdin if omitted)
        file: Option<String>,

        /// Print the decrypted secret as hex (requires allow_reveal)
        #[arg(long)]
        reveal: bool,

        /// Skip the confirmation prompt when revealing
        #[arg(short, long)]
        yes: bool,
    },

    /// Show an envelope's format and field sizes without decrypting
    Inspect {
        /// Envelope JSON file (stdin if omitted)
        file: Option<String>,
    },

    /// Print a new random base64 master key
    GenMaster,

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from the `--config` directory plus environment overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    Settings::load(Path::new(&cli.config))
}

/// Resolve the master secret for commands that seal.
///
/// Warns loudly when the secret is ephemeral.
pub fn master_for_sealing(settings: &Settings) -> Result<MasterSecret> {
    let master = settings.master_secret()?;
    if master.is_ephemeral() {
        output::warning(
            "No master key configured — using a one-off key. \
             This envelope cannot be opened once the command exits.",
        );
        output::tip("Run `keyseal gen-master` and set KEYSEAL_MASTER_KEY.");
    }
    Ok(master)
}

/// Resolve the master secret for commands that open.
///
/// An ephemeral secret can never open an existing envelope, so it is
/// rejected up front.
pub fn master_for_opening(settings: &Settings) -> Result<MasterSecret> {
    if settings.master_key.is_none() {
        return Err(KeySealError::ConfigError(
            "no master key configured — set KEYSEAL_MASTER_KEY or master_key in .keyseal.toml"
                .into(),
        ));
    }
    settings.master_secret()
}

/// Read all bytes from `path`, or from stdin when `path` is `None`.
pub fn read_input(path: Option<&str>) -> Result<Zeroizing<Vec<u8>>> {
    let mut buf = Zeroizing::new(Vec::new());
    match path {
        Some(p) => {
            let mut file = std::fs::File::open(p)?;
            file.read_to_end(&mut buf)?;
        }
        None => {
            std::io::stdin().read_to_end(&mut buf)?;
        }
    }
    Ok(buf)
}

/// An envelope read from input, with whatever key-record metadata came
/// along with it.
#[derive(Debug, Deserialize)]
pub struct EnvelopeInput {
    #[serde(flatten)]
    pub envelope: Envelope,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub eth_address: Option<String>,
}

/// Read a bare envelope or a full key record as JSON.
pub fn read_envelope(path: Option<&str>) -> Result<EnvelopeInput> {
    let raw = read_input(path)?;
    let text = std::str::from_utf8(&raw)
        .map_err(|_| KeySealError::SerializationError("envelope is not UTF-8".into()))?;

    serde_json::from_str(text)
        .map_err(|e| KeySealError::SerializationError(format!("envelope JSON: {e}")))
}
