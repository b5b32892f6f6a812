//! Logger setup built on `tracing-subscriber`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise `default_level` applies to the
/// given binary and its library crates, and `warn` to everything else.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let crate_name = bin_name.replace('-', "_");
    let default_directive = format!(
        "warn,{crate_name}={default_level},tavern_server={default_level},tower_http={default_level}"
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let directives = filter.to_string();

    // try_init: integration tests may install a subscriber more than once
    match tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
    {
        Ok(()) => tracing::debug!(filter = %directives, "logger initialized for {}", bin_name),
        Err(e) => tracing::debug!("logger already installed: {}", e),
    }
}
