//! Tracing subscriber setup.
//!
//! Output goes to stderr and is filtered by `RUST_LOG`. Without it, this
//! crate and HTTP request traces log at `info` and everything else at
//! `warn`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn,library_finder=info,tower_http=info";

/// Install the global tracing subscriber.
///
/// Returns an error if a subscriber has already been installed.
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
}
