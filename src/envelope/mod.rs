//! Envelope module — sealed private-key records.
//!
//! This module provides:
//! - The persisted `Envelope` record and its tagged parse (`format`)
//! - Envelope-level seal and open (`codec`)
//! - Master-secret-to-envelope helpers and `KeyRecord` (`record`)
//! - Ethereum addresses for private keys (`address`)

pub mod address;
pub mod codec;
pub mod format;
pub mod record;

// Re-export the most commonly used items.
pub use address::{address_of, same_address};
pub use codec::{open, open_parsed, seal, SealedSecret};
pub use format::{Envelope, ParsedEnvelope, CURRENT_VERSION, KDF_HKDF_SHA256};
pub use record::{
    generate_and_seal, open_private_key, open_secret, seal_secret, KeyRecord, PrivateKey,
};
