//! Configuration structures for the conversation engine.

use serde::{Deserialize, Serialize};

/// Main configuration structure for Wayfinder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Realtime session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// Credential issuer configuration.
    #[serde(default)]
    pub credentials: CredentialConfig,

    /// Content-generation service configuration.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Suggestion engine tuning.
    #[serde(default)]
    pub suggestion: SuggestionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Media configuration for one realtime session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionConfig {
    /// Whether the local capture device (microphone) is enabled.
    #[serde(default = "default_true")]
    pub capture_enabled: bool,

    /// Whether remote audio playback is enabled.
    #[serde(default = "default_true")]
    pub playback_enabled: bool,
}

impl SessionConfig {
    /// Text-only session: no capture, no playback.
    pub fn text_only() -> Self {
        Self {
            capture_enabled: false,
            playback_enabled: false,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capture_enabled: true,
            playback_enabled: true,
        }
    }
}

/// Credential issuer endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CredentialConfig {
    /// Base URL of the token-issuing collaborator.
    #[serde(default = "default_credential_url")]
    pub base_url: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            base_url: default_credential_url(),
        }
    }
}

fn default_credential_url() -> String {
    "http://localhost:8787/realtime/session".to_string()
}

/// Content-generation service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    /// Base URL of the content-generation service.
    #[serde(default = "default_generation_url")]
    pub base_url: String,

    /// API key for the service. Empty means unconfigured, which is a hard
    /// error at client construction time.
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_generation_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_generation_url() -> String {
    "http://localhost:8787".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

/// Suggestion engine tuning knobs.
///
/// The duplicate and overlap thresholds are heuristics carried over from
/// production tuning, not correctness guarantees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SuggestionConfig {
    /// Retry budget for the core and adjacent tiers.
    #[serde(default = "default_standard_attempts")]
    pub standard_attempts: u32,

    /// Retry budget for the unexpected tier.
    #[serde(default = "default_unexpected_attempts")]
    pub unexpected_attempts: u32,

    /// Jaccard similarity at or above which two cards are the same idea.
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: f64,

    /// Dominant-keyword overlap (token count) at or above which an
    /// unexpected-tier candidate is too close to the user's profile.
    #[serde(default = "default_keyword_overlap_limit")]
    pub keyword_overlap_limit: usize,

    /// How many dominant keywords to extract from the profile.
    #[serde(default = "default_keyword_count")]
    pub keyword_count: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            standard_attempts: default_standard_attempts(),
            unexpected_attempts: default_unexpected_attempts(),
            duplicate_threshold: default_duplicate_threshold(),
            keyword_overlap_limit: default_keyword_overlap_limit(),
            keyword_count: default_keyword_count(),
        }
    }
}

const fn default_standard_attempts() -> u32 {
    3
}

const fn default_unexpected_attempts() -> u32 {
    5
}

const fn default_duplicate_threshold() -> f64 {
    0.6
}

const fn default_keyword_overlap_limit() -> usize {
    2
}

const fn default_keyword_count() -> usize {
    15
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json or pretty.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const fn default_true() -> bool {
    true
}
