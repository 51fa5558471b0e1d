//! `keyseal inspect` — describe an envelope without decrypting it.

use crate::cli::{output, read_envelope};
use crate::errors::Result;

/// Execute the `inspect` command.
pub fn execute(file: Option<&str>) -> Result<()> {
    let input = read_envelope(file)?;

    // Unsupported formats surface here as errors.
    let parsed = input.envelope.parse()?;
    output::print_envelope_table(&input, &parsed);

    Ok(())
}
