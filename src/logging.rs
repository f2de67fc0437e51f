// Logging setup for the command-line entry point
//
// Library code only emits `tracing` events; installing a subscriber is up to
// whoever embeds it.

use tracing_subscriber::EnvFilter;

/// Level used when RUST_LOG is unset or unparsable
const DEFAULT_FILTER: &str = "warn";

/// Install a stderr logger filtered by RUST_LOG
///
/// Fails if a global subscriber is already set.
pub fn try_init_logger() -> std::result::Result<(), impl std::fmt::Display> {
    use tracing_subscriber::prelude::*;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
}

/// Like `try_init_logger`, but failure is only reported on stderr
pub fn init_logger() {
    if let Err(e) = try_init_logger() {
        eprintln!("Warning: Could not initialise logging: {}", e);
    }
}
