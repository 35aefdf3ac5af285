//! Tracing initialization for embedders and tests.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! the embedding application's call. These helpers cover the common case of a
//! formatted stderr subscriber honoring `RUST_LOG`.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a formatted stderr subscriber at `info` level (or `RUST_LOG`).
///
/// Safe to call more than once; only the first call installs anything.
pub fn init() {
    init_with_filter("info");
}

/// Install a formatted stderr subscriber with a default filter directive,
/// overridable through `RUST_LOG`.
pub fn init_with_filter(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.to_string()));
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
