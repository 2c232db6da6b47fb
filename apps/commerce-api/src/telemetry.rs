//! Tracing Setup
//!
//! Installs the global `tracing` subscriber from [`LoggingConfig`].
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives; overrides `observability.logging.level`
//! - `observability.logging.format`: `json` for structured lines, `pretty` for local use
//!
//! # Usage
//!
//! ```rust,ignore
//! use commerce_api::telemetry::init_tracing;
//!
//! init_tracing(&config.observability.logging);
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Build the env filter, preferring `RUST_LOG` over the configured level.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = env_filter(config);

    let result = if config.format == "pretty" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(true)
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing subscriber already installed: {e}");
        return;
    }

    tracing::info!(
        level = %config.level,
        format = %config.format,
        "Tracing initialized"
    );
}
