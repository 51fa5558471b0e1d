//! `keyseal open` — verify an envelope and optionally reveal its secret.
//!
//! Revealing is off unless `allow_reveal` is set in `.keyseal.toml` or
//! `KEYSEAL_ALLOW_REVEAL=true`, and asks for confirmation unless `--yes`.
//!
//! When the input is a key record with an `eth_address`, the recovered key
//! must control that address.

use zeroize::Zeroizing;

use crate::cli::{master_for_opening, output, read_envelope};
use crate::config::Settings;
use crate::envelope::{open_secret, same_address, PrivateKey};
use crate::errors::{KeySealError, Result};

/// Execute the `open` command.
pub fn execute(settings: &Settings, file: Option<&str>, reveal: bool, yes: bool) -> Result<()> {
    if reveal && !settings.allow_reveal {
        return Err(KeySealError::CommandFailed(
            "revealing secrets is disabled — set allow_reveal = true or KEYSEAL_ALLOW_REVEAL=true"
                .into(),
        ));
    }

    let input = read_envelope(file)?;
    let master = master_for_opening(settings)?;
    let plaintext = open_secret(&master, &input.envelope)?;

    let address = match &input.eth_address {
        Some(expected) => Some(check_address(expected, &plaintext)?),
        None => None,
    };

    if !reveal {
        match &address {
            Some(addr) => output::success(&format!("Envelope verified (private key for {addr})")),
            None => output::success(&format!(
                "Envelope verified ({} bytes of plaintext)",
                plaintext.len()
            )),
        }
        return Ok(());
    }

    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt("Print the decrypted secret to the terminal?")
            .default(false)
            .interact()
            .map_err(|e| KeySealError::CommandFailed(format!("confirmation prompt: {e}")))?;
        if !confirmed {
            return Err(KeySealError::UserCancelled);
        }
    }

    let shown = Zeroizing::new(format!("0x{}", hex::encode(plaintext.as_slice())));
    println!("{}", shown.as_str());
    if let Some(addr) = &address {
        output::success(&format!("Address {addr}"));
    }

    Ok(())
}

/// Derive the address of the recovered key and compare it with the one
/// stored in the record.  Returns the derived (checksummed) address.
fn check_address(expected: &str, plaintext: &[u8]) -> Result<String> {
    let actual = PrivateKey::from_slice(plaintext)?.address()?;
    if !same_address(expected, &actual) {
        return Err(KeySealError::AddressMismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(actual)
}
