//! Domain models for the conversation engine.

pub mod config;
pub mod insight;
pub mod phase;
pub mod rubric;
pub mod suggestion;
pub mod transcript;

pub use config::{
    Config, CredentialConfig, GenerationConfig, LoggingConfig, SessionConfig, SuggestionConfig,
};
pub use insight::{Confidence, Insight, InsightKind};
pub use phase::ConversationPhase;
pub use rubric::{
    CardReadiness, ConversationRubric, CoverageKey, EnergyLevel, EngagementStyle, InsightCoverage,
    ReadinessBias, ReadinessStatus, RecommendedFocus,
};
pub use suggestion::{DistanceTier, Suggestion, SuggestionCandidate, Vote};
pub use transcript::{Role, TranscriptItem};
