//! Diagnostic logging initialization.
//!
//! Logs go to stderr so command output on stdout stays clean for piping.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, checked before `RUST_LOG`
pub const LOG_ENV: &str = "TALLY_LOG";

/// Initialize tracing for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
