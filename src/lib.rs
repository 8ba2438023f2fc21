//! Wayfinder - Adaptive Conversation Engine
//!
//! Wayfinder drives a conversational career-exploration session: it keeps a
//! realtime bidirectional session with a conversational inference service,
//! decodes its event stream into a canonical transcript, classifies the
//! dialogue into a phase/readiness state machine, and generates
//! deduplicated suggestion cards from accumulated profile signals.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure models and port traits
//! - **Service Layer** (`services`): The four core engine components
//! - **Infrastructure Layer** (`infrastructure`): External integrations and adapters
//!
//! # Example
//!
//! ```ignore
//! use wayfinder::services::RealtimeSession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Build ports, connect a session, drive transport events.
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{AckError, GenerationError, TransportError};
pub use domain::models::{
    CardReadiness, Config, ConversationPhase, ConversationRubric, DistanceTier, Insight,
    InsightCoverage, InsightKind, ReadinessStatus, Role, SessionConfig, Suggestion,
    SuggestionCandidate, TranscriptItem, Vote,
};
pub use domain::ports::{
    CaptureDevice, CardGenerator, CardRequest, Credential, CredentialIssuer, PeerTransport,
    TransportEvent,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    phase_engine, DecodedEvent, PhaseDecision, RealtimeSession, RubricSignals, SessionStatus,
    SuggestionEngine, TranscriptStore,
};
