//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr so they never mix with `--print-exports`
//! output. Level is controlled by `RUST_LOG` (default: warn, or debug with
//! `--verbose`).

use tracing_subscriber::EnvFilter;

/// Initialise the global subscriber. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok(); // Ignore error if already initialized
}
