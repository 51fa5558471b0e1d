//! Colored terminal output helpers.
//!
//! Status lines go to stderr so stdout carries only machine-readable
//! output (JSON records, keys).

use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::cli::EnvelopeInput;
use crate::envelope::ParsedEnvelope;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    eprintln!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table describing an envelope (no secret material).
pub fn print_envelope_table(input: &EnvelopeInput, parsed: &ParsedEnvelope) {
    let ParsedEnvelope::HkdfSha256V1 { iv, tag, salt, .. } = parsed;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    if let Some(address) = &input.eth_address {
        table.add_row(vec!["eth_address".to_string(), address.clone()]);
    }
    table.add_row(vec!["kdf".to_string(), parsed.kdf().to_string()]);
    table.add_row(vec!["version".to_string(), parsed.version().to_string()]);
    table.add_row(vec![
        "ciphertext".to_string(),
        format!("{} bytes", parsed.ciphertext_len()),
    ]);
    table.add_row(vec!["iv".to_string(), format!("{} bytes", iv.len())]);
    table.add_row(vec!["tag".to_string(), format!("{} bytes", tag.len())]);
    table.add_row(vec!["salt".to_string(), format!("{} bytes", salt.len())]);
    if let Some(ts) = input.created_at {
        table.add_row(vec!["created_at".to_string(), format_timestamp(ts)]);
    }

    println!("{table}");
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
