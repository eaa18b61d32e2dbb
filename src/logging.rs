//! `tracing` subscriber setup for the binary.
//!
//! Library code only emits events; installing a subscriber is the
//! embedding application's call.

use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over `default_filter`.
///
/// Returns an error string if the filter does not parse or a global
/// subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), String> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.trim().is_empty() => EnvFilter::try_new(from_env),
        _ => EnvFilter::try_new(default_filter),
    }
    .map_err(|err| format!("invalid log filter: {err}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| format!("failed to install log subscriber: {err}"))
}
