//! Logging initialization
//!
//! Everything in the crate logs through `tracing`; binaries call [`init`]
//! once at startup to install a subscriber. `RUST_LOG` overrides the default
//! filter.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "admin=info";

/// Install the global fmt subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place and return `false`.
pub fn init() -> bool {
    init_with_filter(DEFAULT_FILTER)
}

/// Same as [`init`] with a custom fallback filter
pub fn init_with_filter(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
