//! Service layer: the four core components of the conversation engine.

pub mod keywords;
pub mod phase_engine;
pub mod session_manager;
pub mod suggestion_engine;
pub mod transcript_decoder;

pub use phase_engine::{PhaseDecision, RubricSignals};
pub use session_manager::{AckWaiter, RealtimeSession, SessionStatus};
pub use suggestion_engine::SuggestionEngine;
pub use transcript_decoder::{decode_event, decode_value, DecodedEvent, TranscriptStore};
