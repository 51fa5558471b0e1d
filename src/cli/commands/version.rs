//! `keyseal version` — display version and envelope format.

use crate::envelope::{CURRENT_VERSION, KDF_HKDF_SHA256};
use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");
    println!("keyseal {current}");
    println!("envelope format: {KDF_HKDF_SHA256} v{CURRENT_VERSION} (AES-256-GCM)");
    Ok(())
}
