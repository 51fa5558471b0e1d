//! The persisted envelope record and its format check.
//!
//! An envelope serializes to JSON with exactly these fields:
//!
//! ```text
//! {
//!   "encrypted_private_key": "<base64 ciphertext>",
//!   "iv":      "<base64, 12 bytes>",
//!   "tag":     "<base64, 16 bytes>",
//!   "salt":    "<base64, 16 bytes>",
//!   "kdf":     "HKDF-SHA256",
//!   "version": 1
//! }
//! ```
//!
//! Binary fields stay as their stored base64 text until [`Envelope::parse`]
//! turns the record into a [`ParsedEnvelope`].  Parsing checks `kdf` and
//! `version` first, so an unknown scheme is rejected before any field is
//! decoded or any key is derived.
//!
//! `kdf` and `version` are kept as raw JSON values.  A record written by
//! some other producer (`"version": "1"`, `1.0`, a missing tag) still
//! deserializes and is then refused as an unsupported format.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::errors::{KeySealError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// The only supported key-derivation tag.
pub const KDF_HKDF_SHA256: &str = "HKDF-SHA256";

/// The only supported envelope format version.
pub const CURRENT_VERSION: i64 = 1;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// An envelope as stored or transmitted.  Immutable once sealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// AES-256-GCM ciphertext without the tag (base64).
    pub encrypted_private_key: String,

    /// 12-byte GCM nonce (base64).
    pub iv: String,

    /// 16-byte GCM authentication tag (base64).
    pub tag: String,

    /// 16-byte HKDF salt (base64).
    pub salt: String,

    /// Key-derivation scheme tag.  `Null` when absent.
    #[serde(default)]
    pub kdf: Value,

    /// Format version.  `Null` when absent.
    #[serde(default)]
    pub version: Value,
}

/// A decoded envelope.  Each variant is one supported scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedEnvelope {
    /// HKDF-SHA256 key derivation, AES-256-GCM, format version 1.
    HkdfSha256V1 {
        ciphertext: Vec<u8>,
        iv: [u8; NONCE_LEN],
        tag: [u8; TAG_LEN],
        salt: [u8; SALT_LEN],
    },
}

impl ParsedEnvelope {
    /// The salt to derive this envelope's key from.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        match self {
            ParsedEnvelope::HkdfSha256V1 { salt, .. } => salt,
        }
    }

    /// Length of the encrypted payload in bytes.
    pub fn ciphertext_len(&self) -> usize {
        match self {
            ParsedEnvelope::HkdfSha256V1 { ciphertext, .. } => ciphertext.len(),
        }
    }

    pub fn kdf(&self) -> &'static str {
        match self {
            ParsedEnvelope::HkdfSha256V1 { .. } => KDF_HKDF_SHA256,
        }
    }

    pub fn version(&self) -> i64 {
        match self {
            ParsedEnvelope::HkdfSha256V1 { .. } => CURRENT_VERSION,
        }
    }
}

impl Envelope {
    /// Build a version-1 envelope from raw parts.
    pub fn hkdf_sha256_v1(
        ciphertext: &[u8],
        iv: &[u8; NONCE_LEN],
        tag: &[u8; TAG_LEN],
        salt: &[u8; SALT_LEN],
    ) -> Self {
        Self {
            encrypted_private_key: BASE64.encode(ciphertext),
            iv: BASE64.encode(iv),
            tag: BASE64.encode(tag),
            salt: BASE64.encode(salt),
            kdf: KDF_HKDF_SHA256.into(),
            version: CURRENT_VERSION.into(),
        }
    }

    /// True when `kdf` and `version` name the supported scheme.
    ///
    /// Only the string `"HKDF-SHA256"` and the integer `1` match; `"1"`,
    /// `1.0` and out-of-range numbers do not.
    pub fn is_supported(&self) -> bool {
        self.kdf.as_str() == Some(KDF_HKDF_SHA256) && self.version.as_i64() == Some(CURRENT_VERSION)
    }

    /// Check the scheme tags and decode every binary field.
    pub fn parse(&self) -> Result<ParsedEnvelope> {
        if !self.is_supported() {
            return Err(KeySealError::UnsupportedFormat {
                kdf: self.kdf.to_string(),
                version: self.version.to_string(),
            });
        }

        Ok(ParsedEnvelope::HkdfSha256V1 {
            ciphertext: decode_field("encrypted_private_key", &self.encrypted_private_key)?,
            iv: decode_fixed("iv", &self.iv)?,
            tag: decode_fixed("tag", &self.tag)?,
            salt: decode_fixed("salt", &self.salt)?,
        })
    }

    /// Parse an envelope from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| KeySealError::SerializationError(format!("envelope JSON: {e}")))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| KeySealError::SerializationError(format!("envelope: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Base64 field helpers
// ---------------------------------------------------------------------------

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| KeySealError::InvalidInput(format!("{name} is not valid base64: {e}")))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> Result<[u8; N]> {
    let bytes = decode_field(name, value)?;
    bytes.as_slice().try_into().map_err(|_| {
        KeySealError::InvalidInput(format!(
            "{name} must decode to {N} bytes, got {}",
            bytes.len()
        ))
    })
}
