use thiserror::Error;

/// All errors that can occur in KeySeal.
#[derive(Debug, Error)]
pub enum KeySealError {
    // --- Crypto errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// `kdf` and `version` hold the tags as JSON text (`"scrypt"`, `2`, `null`).
    #[error("Unsupported envelope format (kdf {kdf}, version {version})")]
    UnsupportedFormat { kdf: String, version: String },

    #[error("Authentication failed — wrong master key, tampered or corrupted envelope")]
    AuthenticationFailure,

    #[error("Address mismatch: record says {expected}, key opens to {actual}")]
    AddressMismatch { expected: String, actual: String },

    // --- Config errors ---
    #[error("Config error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl KeySealError {
    /// True when the envelope can never be opened with this scheme and
    /// a new one has to be issued.
    pub fn is_unrecoverable(&self) -> bool {
        matches!(
            self,
            KeySealError::UnsupportedFormat { .. } | KeySealError::AuthenticationFailure
        )
    }
}

/// Convenience type alias for KeySeal results.
pub type Result<T> = std::result::Result<T, KeySealError>;
