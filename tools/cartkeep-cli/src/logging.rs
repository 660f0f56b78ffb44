//! Log setup for the CLI.
//!
//! Library crates only emit `tracing` events; this installs the subscriber
//! that prints them. Logs go to stderr so `--json` output on stdout stays
//! machine-readable.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// Environment variable that overrides the configured level.
pub const LOG_ENV: &str = "CARTKEEP_LOG";

/// Initialize logging with the provided configuration.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).or_else(|_| {
        let level = if verbose { "debug" } else { config.level.as_str() };
        EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {}", config.level))
    })?;

    let registry = Registry::default().with(filter);
    if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_target(true))
            .try_init()
            .context("Failed to install log subscriber")?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
            .context("Failed to install log subscriber")?;
    }

    Ok(())
}
