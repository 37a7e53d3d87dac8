//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Initialise the global subscriber. `RUST_LOG` overrides the default
/// level.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,leadforge=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}
