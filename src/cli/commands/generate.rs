//! `keyseal generate` — create a random private key and seal it.
//!
//! Only the sealed record (with the account address) is printed; the
//! key itself never leaves memory.

use crate::cli::{master_for_sealing, output};
use crate::config::Settings;
use crate::envelope::{generate_and_seal, KeyRecord};
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(settings: &Settings) -> Result<()> {
    let master = master_for_sealing(settings)?;
    let (key, envelope) = generate_and_seal(&master)?;

    let record = KeyRecord::for_private_key(&key, envelope)?;
    println!("{}", record.to_json()?);
    output::success(&format!(
        "Generated and sealed a new private key for {}",
        record.eth_address.as_deref().unwrap_or_default()
    ));

    Ok(())
}
