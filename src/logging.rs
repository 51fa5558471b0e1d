//! Diagnostic logging via `tracing`.
//!
//! Library code emits events (lengths and outcomes only, never key
//! material or plaintext).  The binary installs a stderr subscriber so
//! stdout stays clean for JSON output.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_level`; `verbose` forces `debug`.
/// Calling this twice is harmless.
pub fn init(default_level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
