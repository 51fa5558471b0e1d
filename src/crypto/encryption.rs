//! AES-256-GCM authenticated encryption with a detached tag.
//!
//! Each call to `seal_detached` generates a fresh random 12-byte nonce;
//! callers cannot supply their own.  The ciphertext, nonce and 16-byte
//! tag come back as separate values because the envelope stores them in
//! separate fields.  No associated data is used.

use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce, Tag};
use zeroize::Zeroizing;

use super::keys::DerivedKey;
use crate::errors::{KeySealError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Raw output of one seal operation.
#[derive(Debug, Clone)]
pub struct Detached {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
}

fn cipher_for(key: &DerivedKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
///
/// Only fails for plaintexts beyond the GCM length limit (64 GiB).
pub fn seal_detached(key: &DerivedKey, plaintext: &[u8]) -> Result<Detached> {
    let cipher = cipher_for(key);
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&nonce, b"", &mut buffer)
        .map_err(|e| KeySealError::InvalidInput(format!("encryption error: {e}")))?;

    let mut detached = Detached {
        ciphertext: buffer,
        nonce: [0u8; NONCE_LEN],
        tag: [0u8; TAG_LEN],
    };
    detached.nonce.copy_from_slice(&nonce);
    detached.tag.copy_from_slice(&tag);
    Ok(detached)
}

/// Verify `tag` and decrypt `ciphertext`.
///
/// The tag is checked in constant time before any keystream is applied;
/// on mismatch no plaintext is produced.
pub fn open_detached(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = cipher_for(key);

    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(nonce),
            b"",
            &mut buffer,
            Tag::from_slice(tag),
        )
        .map_err(|_| KeySealError::AuthenticationFailure)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ciphertext_length_matches_plaintext() {
        let key = DerivedKey::from_bytes([0x11u8; 32]);
        let sealed = seal_detached(&key, b"0123456789").unwrap();
        assert_eq!(sealed.ciphertext.len(), 10);
    }

    #[test]
    fn empty_plaintext_still_authenticates() {
        let key = DerivedKey::from_bytes([0x22u8; 32]);
        let mut sealed = seal_detached(&key, b"").unwrap();
        assert!(sealed.ciphertext.is_empty());
        assert!(open_detached(&key, &sealed.nonce, &sealed.ciphertext, &sealed.tag)
            .unwrap()
            .is_empty());

        sealed.tag[0] ^= 1;
        assert!(matches!(
            open_detached(&key, &sealed.nonce, &sealed.ciphertext, &sealed.tag),
            Err(KeySealError::AuthenticationFailure)
        ));
    }

    // NIST GCM test case 14: AES-256, zero key, zero IV, one zero block.
    #[test]
    fn matches_known_answer_vector() {
        let key = DerivedKey::from_bytes([0u8; 32]);
        let nonce = [0u8; NONCE_LEN];
        let ciphertext = hex::decode("cea7403d4d606b6e074ec5d3baf39d18").unwrap();
        let tag: [u8; TAG_LEN] = hex::decode("d0d1c8a799996bf0265b98b5d48ab919")
            .unwrap()
            .try_into()
            .unwrap();

        let plaintext = open_detached(&key, &nonce, &ciphertext, &tag).unwrap();
        assert_eq!(plaintext.as_slice(), &[0u8; 16]);
    }
}
