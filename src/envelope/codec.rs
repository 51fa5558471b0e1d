//! Seal and open at the envelope level.
//!
//! `seal` turns a derived key and plaintext into base64 ciphertext, nonce
//! and tag.  `open` runs the format check, decodes the stored fields and
//! decrypts; it returns either the full plaintext or an error, never a
//! partial buffer.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::Zeroizing;

use super::format::{Envelope, ParsedEnvelope};
use crate::crypto::{self, DerivedKey};
use crate::errors::Result;

/// Base64 output of one seal operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    pub ciphertext: String,
    pub iv: String,
    pub tag: String,
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
pub fn seal(key: &DerivedKey, plaintext: &[u8]) -> Result<SealedSecret> {
    let detached = crypto::seal_detached(key, plaintext)?;
    tracing::debug!(len = plaintext.len(), "sealed secret");

    Ok(SealedSecret {
        ciphertext: BASE64.encode(&detached.ciphertext),
        iv: BASE64.encode(detached.nonce),
        tag: BASE64.encode(detached.tag),
    })
}

/// Open `envelope` with `key`.
///
/// Fails with `UnsupportedFormat` before touching any ciphertext if the
/// scheme tags are unknown, and with `AuthenticationFailure` if the tag
/// does not verify.
pub fn open(key: &DerivedKey, envelope: &Envelope) -> Result<Zeroizing<Vec<u8>>> {
    let parsed = envelope.parse()?;
    open_parsed(key, &parsed)
}

/// Open an already parsed envelope.
pub fn open_parsed(key: &DerivedKey, parsed: &ParsedEnvelope) -> Result<Zeroizing<Vec<u8>>> {
    match parsed {
        ParsedEnvelope::HkdfSha256V1 {
            ciphertext, iv, tag, ..
        } => {
            let plaintext = crypto::open_detached(key, iv, ciphertext, tag).map_err(|e| {
                tracing::warn!("envelope failed authentication");
                e
            })?;
            tracing::debug!(len = plaintext.len(), "opened envelope");
            Ok(plaintext)
        }
    }
}
