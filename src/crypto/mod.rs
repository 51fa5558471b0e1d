//! Cryptographic primitives for KeySeal.
//!
//! This module provides:
//! - Master secret and derived key types (`keys`)
//! - HKDF-SHA256 per-record key derivation (`kdf`)
//! - AES-256-GCM encryption with a detached tag (`encryption`)

pub mod encryption;
pub mod kdf;
pub mod keys;

pub use encryption::{open_detached, seal_detached, Detached, NONCE_LEN, TAG_LEN};
pub use kdf::{derive, derive_key, generate_salt, DEFAULT_INFO, SALT_LEN};
pub use keys::{DerivedKey, MasterSecret, SecretSource, KEY_LEN, MASTER_SECRET_LEN};
