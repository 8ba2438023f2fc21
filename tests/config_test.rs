//! Integration tests for hierarchical configuration loading: defaults,
//! yaml file overrides, environment overrides, and validation.

use std::io::Write;

use tempfile::NamedTempFile;

use wayfinder::domain::models::Config;
use wayfinder::infrastructure::{ConfigError, ConfigLoader};

fn write_yaml(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write yaml");
    file
}

#[test]
fn test_defaults_load_without_any_file() {
    let file = write_yaml("");
    let config = ConfigLoader::load_from_file(file.path()).expect("load failed");

    assert!(config.session.capture_enabled);
    assert!(config.session.playback_enabled);
    assert_eq!(config.suggestion.standard_attempts, 3);
    assert_eq!(config.suggestion.unexpected_attempts, 5);
    assert!((config.suggestion.duplicate_threshold - 0.6).abs() < f64::EPSILON);
    assert_eq!(config.suggestion.keyword_overlap_limit, 2);
    assert_eq!(config.generation.timeout_secs, 60);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "pretty");
}

#[test]
fn test_yaml_overrides_defaults_and_keeps_the_rest() {
    let file = write_yaml(
        r#"
session:
  capture_enabled: false
suggestion:
  unexpected_attempts: 7
logging:
  level: debug
"#,
    );
    let config = ConfigLoader::load_from_file(file.path()).expect("load failed");

    assert!(!config.session.capture_enabled);
    // Untouched keys keep their defaults.
    assert!(config.session.playback_enabled);
    assert_eq!(config.suggestion.unexpected_attempts, 7);
    assert_eq!(config.suggestion.standard_attempts, 3);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_environment_overrides_yaml() {
    // `WAYFINDER_` prefix with `__` as the section separator.
    std::env::set_var("WAYFINDER_LOGGING__LEVEL", "warn");
    std::env::set_var("WAYFINDER_GENERATION__TIMEOUT_SECS", "15");

    let config = ConfigLoader::load().expect("load failed");
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.generation.timeout_secs, 15);

    std::env::remove_var("WAYFINDER_LOGGING__LEVEL");
    std::env::remove_var("WAYFINDER_GENERATION__TIMEOUT_SECS");
}

#[test]
fn test_invalid_yaml_values_fail_validation() {
    let file = write_yaml(
        r#"
suggestion:
  duplicate_threshold: 2.5
"#,
    );
    assert!(ConfigLoader::load_from_file(file.path()).is_err());
}

#[test]
fn test_validate_rejects_empty_urls() {
    let mut config = Config::default();
    config.credentials.base_url = String::new();
    assert!(matches!(
        ConfigLoader::validate(&config),
        Err(ConfigError::EmptyCredentialUrl)
    ));

    let mut config = Config::default();
    config.generation.base_url = "   ".to_string();
    assert!(matches!(
        ConfigLoader::validate(&config),
        Err(ConfigError::EmptyGenerationUrl)
    ));
}

#[test]
fn test_validate_rejects_zero_budgets_and_counts() {
    let mut config = Config::default();
    config.suggestion.standard_attempts = 0;
    assert!(matches!(
        ConfigLoader::validate(&config),
        Err(ConfigError::InvalidRetryBudget(0))
    ));

    let mut config = Config::default();
    config.suggestion.keyword_count = 0;
    assert!(matches!(
        ConfigLoader::validate(&config),
        Err(ConfigError::InvalidKeywordCount(0))
    ));

    let mut config = Config::default();
    config.generation.timeout_secs = 0;
    assert!(matches!(
        ConfigLoader::validate(&config),
        Err(ConfigError::InvalidTimeout(0))
    ));
}

#[test]
fn test_validate_rejects_unknown_logging_settings() {
    let mut config = Config::default();
    config.logging.format = "xml".to_string();
    assert!(matches!(
        ConfigLoader::validate(&config),
        Err(ConfigError::InvalidLogFormat(_))
    ));
}

#[test]
fn test_default_config_round_trips_through_serde() {
    let config = Config::default();
    let yaml = serde_json::to_string(&config).expect("serialize failed");
    let restored: Config = serde_json::from_str(&yaml).expect("deserialize failed");
    assert_eq!(restored.logging.level, config.logging.level);
    assert_eq!(
        restored.suggestion.standard_attempts,
        config.suggestion.standard_attempts
    );
}
