//! Logging initialization using tracing.

use std::io;

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::domain::models::LoggingConfig;

/// Initialize the global tracing subscriber from logging configuration.
///
/// The configured level is the default; the `RUST_LOG` environment
/// variable still overrides per-target filtering.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let default_level = parse_log_level(&config.level)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(io::stdout)
                .with_target(true)
                .with_env_filter(env_filter)
                .try_init()
                .map_err(|err| anyhow!("Failed to initialize logger: {err}"))?;
        }
        "pretty" => {
            tracing_subscriber::fmt()
                .pretty()
                .with_writer(io::stdout)
                .with_target(true)
                .with_env_filter(env_filter)
                .try_init()
                .map_err(|err| anyhow!("Failed to initialize logger: {err}"))?;
        }
        other => return Err(anyhow!("Unknown log format: {other}")),
    }

    Ok(())
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(anyhow!("Unknown log level: {other}")),
    }
}
