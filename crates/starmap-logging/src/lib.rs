//! Tracing setup for starmap binaries and tests.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from the directives
//! the caller passes in.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directives used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "starmap_tree=info,starmap_cli=info,starmap_replay=info";

/// Install the global subscriber: env filter plus a `fmt` layer.
///
/// Fails if a global subscriber is already installed.
pub fn init(default_directives: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(filter(default_directives))
        .with(fmt::layer())
        .try_init()
}

/// Install a subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call takes effect.
pub fn init_for_tests() {
    let _ = tracing_subscriber::registry()
        .with(filter("starmap_tree=debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

fn filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}
