//! Per-record key derivation using HKDF-SHA256.
//!
//! The master secret is the input keying material, a fresh 16-byte
//! random salt is drawn per envelope, and a fixed `info` label binds
//! the output to its purpose.  Running the full extract-and-expand
//! (RFC 5869) with the stored salt always reproduces the same key.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use hkdf::Hkdf;
use sha2::Sha256;

use super::keys::{DerivedKey, MasterSecret, MASTER_SECRET_LEN};
use crate::errors::{KeySealError, Result};

/// Length of the per-record salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Domain-separation label for private-key envelope keys.
pub const DEFAULT_INFO: &str = "eth-key-encryption";

/// Derive a 32-byte key from `master`, `salt` and `info`.
///
/// `master` must be 32 bytes and `salt` 16 bytes; anything else is a
/// caller bug and yields `InvalidInput`.
pub fn derive(master: &[u8], salt: &[u8], info: &[u8]) -> Result<DerivedKey> {
    if master.len() != MASTER_SECRET_LEN {
        return Err(KeySealError::InvalidInput(format!(
            "master secret must be exactly {MASTER_SECRET_LEN} bytes, got {}",
            master.len()
        )));
    }
    if salt.len() != SALT_LEN {
        return Err(KeySealError::InvalidInput(format!(
            "salt must be exactly {SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }

    let hk = Hkdf::<Sha256>::new(Some(salt), master);

    let mut key = DerivedKey::zeroed();
    hk.expand(info, key.as_mut_bytes())
        .map_err(|e| KeySealError::InvalidInput(format!("HKDF expand failed: {e}")))?;

    Ok(key)
}

/// Derive the envelope key for `salt` with the default info label.
pub fn derive_key(master: &MasterSecret, salt: &[u8; SALT_LEN]) -> Result<DerivedKey> {
    derive(master.as_bytes(), salt, DEFAULT_INFO.as_bytes())
}

/// Generate a random 16-byte salt from the OS CSPRNG.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}
