//! Tracing subscriber setup

use crate::config::LoggingConfig;
use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` wins, then `--verbose`, then the configured level
fn build_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { config.level.as_str() };
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{fallback},hyper=warn,reqwest=warn")))
}

/// Install the global subscriber. Logs go to stderr.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = build_filter(config, verbose);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };

    installed.map_err(|e| anyhow!("Failed to initialise logging: {e}"))
}
