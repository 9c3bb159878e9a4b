//! Subscriber setup for binaries and tests.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Installs a global fmt subscriber; `RUST_LOG` overrides `default_filter`.
///
/// Returns `false` when a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    Registry::default()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}
