//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Installs a stderr `tracing` subscriber. `RUST_LOG` overrides `filter`.
///
/// Stdout carries the host bridge protocol, so logs never go there. Calling
/// this more than once is harmless; only the first call installs anything.
pub fn init(filter: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
