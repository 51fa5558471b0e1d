//! `keyseal completions <shell>` — print a completion script for bash,
//! zsh or fish to stdout.

use std::io;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;
use crate::errors::{KeySealError, Result};

const SUPPORTED: [(&str, Shell); 3] = [
    ("bash", Shell::Bash),
    ("zsh", Shell::Zsh),
    ("fish", Shell::Fish),
];

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    let shell = shell_named(shell)?;
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin, &mut io::stdout());
    Ok(())
}

fn shell_named(name: &str) -> Result<Shell> {
    SUPPORTED
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name.trim()))
        .map(|&(_, shell)| shell)
        .ok_or_else(|| {
            KeySealError::CommandFailed(format!(
                "no completions for '{name}' — choose bash, zsh or fish"
            ))
        })
}
