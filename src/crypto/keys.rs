//! Key material types.
//!
//! - [`MasterSecret`]: the 32-byte process-wide secret every per-record
//!   key is derived from.  Remembers whether it was configured or
//!   generated on the fly.
//! - [`DerivedKey`]: a 32-byte AES-256 key that lives for one seal or
//!   open call.
//!
//! Both zero their memory on drop, redact themselves in `Debug` output
//! and are never serialized.

use std::fmt;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::errors::{KeySealError, Result};

/// Length of the master secret in bytes (256 bits).
pub const MASTER_SECRET_LEN: usize = 32;

/// Length of a derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Where a master secret came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    /// Loaded from configuration; survives restarts.
    Configured,
    /// Generated at startup and held only in memory.  Envelopes sealed
    /// under it cannot be opened after the process exits.
    Ephemeral,
}

/// The 32-byte master secret.
///
/// Constructed once at startup and passed explicitly to every derive,
/// seal and open call.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret {
    bytes: [u8; MASTER_SECRET_LEN],
    #[zeroize(skip)]
    source: SecretSource,
}

impl MasterSecret {
    /// Wrap configured raw bytes.
    pub fn from_bytes(bytes: [u8; MASTER_SECRET_LEN]) -> Self {
        Self {
            bytes,
            source: SecretSource::Configured,
        }
    }

    /// Wrap configured bytes of unchecked length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; MASTER_SECRET_LEN] = bytes.try_into().map_err(|_| {
            KeySealError::InvalidInput(format!(
                "master secret must be exactly {MASTER_SECRET_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Decode a base64 (standard alphabet) master secret.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = Zeroizing::new(BASE64.decode(encoded.trim()).map_err(|e| {
            KeySealError::InvalidInput(format!("master secret is not valid base64: {e}"))
        })?);
        Self::from_slice(&decoded)
    }

    /// Generate a fresh random master secret that is never persisted.
    pub fn generate_ephemeral() -> Self {
        let mut bytes = [0u8; MASTER_SECRET_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self {
            bytes,
            source: SecretSource::Ephemeral,
        }
    }

    /// Access the raw secret bytes (e.g. to feed HKDF).
    pub fn as_bytes(&self) -> &[u8; MASTER_SECRET_LEN] {
        &self.bytes
    }

    pub fn source(&self) -> SecretSource {
        self.source
    }

    /// True when this secret was generated at startup rather than configured.
    pub fn is_ephemeral(&self) -> bool {
        self.source == SecretSource::Ephemeral
    }

    /// Base64 encoding of the secret, for writing it into configuration.
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(BASE64.encode(self.bytes))
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterSecret")
            .field("bytes", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

/// A per-record AES-256 key produced by HKDF.
///
/// Equality is constant-time.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Wrap key bytes of unchecked length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            KeySealError::InvalidInput(format!(
                "derived key must be exactly {KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    pub(crate) fn zeroed() -> Self {
        Self {
            bytes: [0u8; KEY_LEN],
        }
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; KEY_LEN] {
        &mut self.bytes
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for DerivedKey {}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}
