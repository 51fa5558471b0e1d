//! One-call helpers that go straight from a master secret to an
//! envelope and back.
//!
//! `seal_secret` draws the salt, derives the key, seals and assembles the
//! envelope.  `open_secret` parses, re-derives from the stored salt and
//! opens.  The derived key is dropped (and zeroed) before either returns.
//!
//! A [`KeyRecord`] written for a private key also carries the account's
//! Ethereum address, so the key can be checked after opening.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use aes_gcm::aead::OsRng;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::address;
use super::codec;
use super::format::{Envelope, ParsedEnvelope, CURRENT_VERSION, KDF_HKDF_SHA256};
use crate::crypto::{derive_key, generate_salt, MasterSecret};
use crate::errors::{KeySealError, Result};

/// Length of a private key in bytes.
pub const PRIVATE_KEY_LEN: usize = 32;

/// Seal `plaintext` under a key derived from `master` and a fresh salt.
pub fn seal_secret(master: &MasterSecret, plaintext: &[u8]) -> Result<Envelope> {
    let salt = generate_salt();
    let key = derive_key(master, &salt)?;
    let sealed = codec::seal(&key, plaintext)?;

    Ok(Envelope {
        encrypted_private_key: sealed.ciphertext,
        iv: sealed.iv,
        tag: sealed.tag,
        salt: BASE64.encode(salt),
        kdf: KDF_HKDF_SHA256.into(),
        version: CURRENT_VERSION.into(),
    })
}

/// Open an envelope produced by [`seal_secret`] with the same master secret.
pub fn open_secret(master: &MasterSecret, envelope: &Envelope) -> Result<Zeroizing<Vec<u8>>> {
    let parsed = envelope.parse()?;
    let key = derive_key(master, parsed.salt())?;
    codec::open_parsed(&key, &parsed)
}

// ---------------------------------------------------------------------------
// Private keys
// ---------------------------------------------------------------------------

/// A 32-byte private key, zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; PRIVATE_KEY_LEN],
}

impl PrivateKey {
    /// Draw a new secp256k1 key from the OS CSPRNG.  Always a valid
    /// scalar, so [`address`](Self::address) cannot fail for it.
    pub fn generate() -> Self {
        let secret = k256::SecretKey::random(&mut OsRng);
        let mut bytes = [0u8; PRIVATE_KEY_LEN];
        bytes.copy_from_slice(&secret.to_bytes());
        Self { bytes }
    }

    pub fn from_bytes(bytes: [u8; PRIVATE_KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Build from recovered plaintext; anything but 32 bytes is rejected.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; PRIVATE_KEY_LEN] = bytes.try_into().map_err(|_| {
            KeySealError::InvalidInput(format!(
                "private key must be exactly {PRIVATE_KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Parse a hex key, with or without a `0x` prefix.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let trimmed = hex_str.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = Zeroizing::new(
            hex::decode(digits)
                .map_err(|e| KeySealError::InvalidInput(format!("private key is not hex: {e}")))?,
        );
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.bytes
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("0x{}", hex::encode(self.bytes)))
    }

    /// EIP-55 checksummed Ethereum address for this key.
    pub fn address(&self) -> Result<String> {
        address::address_of(&self.bytes)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// Generate a fresh private key and seal it under `master`.
pub fn generate_and_seal(master: &MasterSecret) -> Result<(PrivateKey, Envelope)> {
    let key = PrivateKey::generate();
    let envelope = seal_secret(master, key.as_bytes())?;
    Ok((key, envelope))
}

/// Open an envelope that holds a private key.
pub fn open_private_key(master: &MasterSecret, envelope: &Envelope) -> Result<PrivateKey> {
    let plaintext = open_secret(master, envelope)?;
    PrivateKey::from_slice(&plaintext)
}

// ---------------------------------------------------------------------------
// KeyRecord
// ---------------------------------------------------------------------------

/// An envelope together with its creation time and, for private keys,
/// the account address.
///
/// Serializes as the six envelope fields plus `created_at` (RFC 3339) and
/// `eth_address` when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_address: Option<String>,

    #[serde(flatten)]
    pub envelope: Envelope,

    pub created_at: DateTime<Utc>,
}

impl KeyRecord {
    pub fn new(envelope: Envelope) -> Self {
        Self {
            eth_address: None,
            envelope,
            created_at: Utc::now(),
        }
    }

    /// Record for a sealed private key, stamped with its address.
    pub fn for_private_key(key: &PrivateKey, envelope: Envelope) -> Result<Self> {
        Ok(Self {
            eth_address: Some(key.address()?),
            ..Self::new(envelope)
        })
    }

    /// Check the format tags without decrypting.
    pub fn parse(&self) -> Result<ParsedEnvelope> {
        self.envelope.parse()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| KeySealError::SerializationError(format!("key record: {e}")))
    }
}
