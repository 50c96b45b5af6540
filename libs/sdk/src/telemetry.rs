//! Tracing initialization.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter.
pub const ENV_LOG: &str = "EVENTAPI_LOG";

/// Installs a JSON subscriber as the global default.
///
/// The filter is read from `EVENTAPI_LOG`, then `RUST_LOG`, falling back to
/// `default_filter`. Fails if a global subscriber is already set.
pub fn init(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .context("failed to install tracing subscriber")
}
