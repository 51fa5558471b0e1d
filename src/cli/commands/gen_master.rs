//! `keyseal gen-master` — print a fresh base64 master key.

use crate::cli::output;
use crate::crypto::MasterSecret;
use crate::errors::Result;

/// Execute the `gen-master` command.
pub fn execute() -> Result<()> {
    let master = MasterSecret::generate_ephemeral();
    println!("{}", master.to_base64().as_str());

    output::tip("Store this as KEYSEAL_MASTER_KEY. Losing it makes every envelope unreadable.");
    Ok(())
}
