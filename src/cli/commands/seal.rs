//! `keyseal seal` — seal a secret and print its key record.
//!
//! `--hex` takes a secp256k1 private key and stamps the record with its
//! address.  File or stdin input is sealed as raw bytes, empty included.

use crate::cli::{master_for_sealing, output, read_input};
use crate::config::Settings;
use crate::envelope::{seal_secret, KeyRecord, PrivateKey};
use crate::errors::Result;

/// Execute the `seal` command.
pub fn execute(settings: &Settings, input: Option<&str>, hex_key: Option<&str>) -> Result<()> {
    match hex_key {
        Some(h) => seal_private_key(settings, &PrivateKey::from_hex(h)?),
        None => seal_bytes(settings, &read_input(input)?),
    }
}

fn seal_private_key(settings: &Settings, key: &PrivateKey) -> Result<()> {
    // Reject keys with no account before sealing anything.
    let address = key.address()?;

    let master = master_for_sealing(settings)?;
    let record = KeyRecord::for_private_key(key, seal_secret(&master, key.as_bytes())?)?;

    println!("{}", record.to_json()?);
    output::success(&format!("Sealed private key for {address}"));
    Ok(())
}

fn seal_bytes(settings: &Settings, plaintext: &[u8]) -> Result<()> {
    let master = master_for_sealing(settings)?;
    let record = KeyRecord::new(seal_secret(&master, plaintext)?);

    println!("{}", record.to_json()?);
    output::success(&format!("Sealed {} bytes", plaintext.len()));
    Ok(())
}
