use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Credential issuer base_url cannot be empty")]
    EmptyCredentialUrl,

    #[error("Generation service base_url cannot be empty")]
    EmptyGenerationUrl,

    #[error("Invalid timeout: {0}. Must be at least 1 second")]
    InvalidTimeout(u64),

    #[error("Invalid retry budget: {0}. Cannot be 0")]
    InvalidRetryBudget(u32),

    #[error("Invalid duplicate threshold: {0}. Must be within (0, 1]")]
    InvalidDuplicateThreshold(f64),

    #[error("Invalid keyword count: {0}. Must be at least 1")]
    InvalidKeywordCount(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. wayfinder.yaml (project config)
    /// 3. Environment variables (`WAYFINDER_*` prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("wayfinder.yaml"))
            .merge(Env::prefixed("WAYFINDER_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.credentials.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyCredentialUrl);
        }

        if config.generation.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyGenerationUrl);
        }

        if config.generation.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.generation.timeout_secs));
        }

        if config.suggestion.standard_attempts == 0 {
            return Err(ConfigError::InvalidRetryBudget(
                config.suggestion.standard_attempts,
            ));
        }
        if config.suggestion.unexpected_attempts == 0 {
            return Err(ConfigError::InvalidRetryBudget(
                config.suggestion.unexpected_attempts,
            ));
        }

        let threshold = config.suggestion.duplicate_threshold;
        if threshold <= 0.0 || threshold > 1.0 {
            return Err(ConfigError::InvalidDuplicateThreshold(threshold));
        }

        if config.suggestion.keyword_count == 0 {
            return Err(ConfigError::InvalidKeywordCount(
                config.suggestion.keyword_count,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(ConfigLoader::validate(&Config::default()).is_ok());
    }

    #[test]
    fn empty_generation_url_fails() {
        let mut config = Config::default();
        config.generation.base_url = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyGenerationUrl)
        ));
    }

    #[test]
    fn zero_retry_budget_fails() {
        let mut config = Config::default();
        config.suggestion.unexpected_attempts = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRetryBudget(0))
        ));
    }

    #[test]
    fn out_of_range_threshold_fails() {
        let mut config = Config::default();
        config.suggestion.duplicate_threshold = 1.5;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidDuplicateThreshold(_))
        ));
    }

    #[test]
    fn unknown_log_level_fails() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
