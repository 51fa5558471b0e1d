use std::path::Path;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::MasterSecret;
use crate::errors::{KeySealError, Result};

/// Environment variable holding the base64 master secret.
pub const MASTER_KEY_ENV: &str = "KEYSEAL_MASTER_KEY";

/// Legacy variable name still honoured when `KEYSEAL_MASTER_KEY` is unset.
pub const LEGACY_MASTER_KEY_ENV: &str = "MASTER_KEY_BASE64";

/// Environment variable that enables printing opened secrets.
pub const ALLOW_REVEAL_ENV: &str = "KEYSEAL_ALLOW_REVEAL";

/// Environment variable that forbids the ephemeral fallback.
pub const REQUIRE_MASTER_KEY_ENV: &str = "KEYSEAL_REQUIRE_MASTER_KEY";

/// Process-level configuration, loaded from `.keyseal.toml`.
///
/// Every field has a default so KeySeal runs without any config file.
/// Environment variables override the file.
#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base64 master secret (32 bytes once decoded).
    #[serde(default)]
    pub master_key: Option<String>,

    /// Refuse to start with a generated, unpersisted master secret.
    #[serde(default)]
    pub require_master_key: bool,

    /// Allow `open --reveal` to print plaintext secrets.
    #[serde(default)]
    pub allow_reveal: bool,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_log_level() -> String {
    "warn".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_key: None,
            require_master_key: false,
            allow_reveal: false,
            log_level: default_log_level(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("master_key", &self.master_key.as_ref().map(|_| "[REDACTED]"))
            .field("require_master_key", &self.require_master_key)
            .field("allow_reveal", &self.allow_reveal)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Settings {
    /// Name of the config file we look for in the config directory.
    pub const FILE_NAME: &'static str = ".keyseal.toml";

    /// Load settings from `<config_dir>/.keyseal.toml`, then apply
    /// environment overrides.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let mut settings = Self::load_file(config_dir)?;
        settings.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(settings)
    }

    /// Load only the config file.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load_file(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = Zeroizing::new(std::fs::read_to_string(&config_path)?);

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            KeySealError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let master = lookup(MASTER_KEY_ENV)
            .filter(|v| !v.is_empty())
            .or_else(|| lookup(LEGACY_MASTER_KEY_ENV).filter(|v| !v.is_empty()));
        if let Some(master) = master {
            self.master_key = Some(master);
        }

        if let Some(value) = lookup(ALLOW_REVEAL_ENV) {
            self.allow_reveal = parse_bool(ALLOW_REVEAL_ENV, &value)?;
        }
        if let Some(value) = lookup(REQUIRE_MASTER_KEY_ENV) {
            self.require_master_key = parse_bool(REQUIRE_MASTER_KEY_ENV, &value)?;
        }

        Ok(())
    }

    /// Resolve the master secret.
    ///
    /// A configured key must decode to exactly 32 bytes.  Without one, a
    /// random secret is generated unless `require_master_key` is set.
    /// Envelopes sealed under a generated secret are lost when the
    /// process exits, so that case is logged as a warning.
    pub fn master_secret(&self) -> Result<MasterSecret> {
        match &self.master_key {
            Some(encoded) => MasterSecret::from_base64(encoded)
                .map_err(|e| KeySealError::ConfigError(format!("master_key: {e}"))),
            None if self.require_master_key => Err(KeySealError::ConfigError(format!(
                "no master key configured — set {MASTER_KEY_ENV} or master_key in {}",
                Self::FILE_NAME
            ))),
            None => {
                tracing::warn!(
                    "no master key configured; generated an ephemeral one. \
                     Envelopes sealed now cannot be opened after restart"
                );
                Ok(MasterSecret::generate_ephemeral())
            }
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(KeySealError::ConfigError(format!(
            "{name} must be true or false, got '{other}'"
        ))),
    }
}

// ── Tests ────────────────────────────────────────────────────────────
