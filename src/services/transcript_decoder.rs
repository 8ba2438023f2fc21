//! Transcript event decoder.
//!
//! Pure decode step for inbound protocol events. The event taxonomy on the
//! wire is heterogeneous and expected to grow, so decoding maps each event
//! to exactly zero or one instruction and silently ignores anything it does
//! not recognize. Applying instructions to the transcript lives in
//! [`TranscriptStore`], kept separate so both halves test in isolation.

use serde_json::Value;
use tracing::debug;

use crate::domain::models::{Role, TranscriptItem};

/// Instruction decoded from one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
    /// Append a text fragment to the item with this id.
    TranscriptDelta {
        role: Role,
        id: String,
        fragment: String,
    },

    /// Finalize the item with this id, replacing any accumulated deltas.
    TranscriptFinal { role: Role, id: String, text: String },

    /// The remote service accepted a submitted item.
    Acknowledgment { id: String },

    /// A generation started; the session manager starts its latency clock.
    ResponseStarted { response_id: String },

    /// A generation completed; the session manager samples latency.
    ResponseCompleted { response_id: String },

    /// Recognized as noise, or not recognized at all. Never an error.
    Ignored,
}

/// Decodes a raw data-channel payload.
///
/// Malformed or non-JSON input is logged and ignored; it must never crash
/// the caller or touch the transcript.
pub fn decode_event(raw: &str) -> DecodedEvent {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => decode_value(&value),
        Err(err) => {
            debug!(error = %err, "Dropping malformed inbound event");
            DecodedEvent::Ignored
        }
    }
}

/// Decodes an already-parsed event object.
pub fn decode_value(event: &Value) -> DecodedEvent {
    let Some(event_type) = event.get("type").and_then(Value::as_str) else {
        return DecodedEvent::Ignored;
    };

    match event_type {
        "response.output_audio_transcript.delta" | "response.text.delta" => {
            decode_delta(Role::Assistant, event)
        }
        "response.output_audio_transcript.done" | "response.text.done" => {
            decode_final(Role::Assistant, event)
        }
        "conversation.item.input_audio_transcription.delta" => decode_delta(Role::User, event),
        "conversation.item.input_audio_transcription.completed" => decode_final(Role::User, event),
        "conversation.item.created" => match extract_ack_id(event) {
            Some(id) => DecodedEvent::Acknowledgment { id },
            None => DecodedEvent::Ignored,
        },
        "response.created" => match extract_id(event) {
            Some(response_id) => DecodedEvent::ResponseStarted { response_id },
            None => DecodedEvent::Ignored,
        },
        "response.done" => match extract_id(event) {
            Some(response_id) => DecodedEvent::ResponseCompleted { response_id },
            None => DecodedEvent::Ignored,
        },
        _ => DecodedEvent::Ignored,
    }
}

fn decode_delta(role: Role, event: &Value) -> DecodedEvent {
    match (extract_id(event), extract_text(event)) {
        (Some(id), Some(fragment)) => DecodedEvent::TranscriptDelta { role, id, fragment },
        _ => DecodedEvent::Ignored,
    }
}

fn decode_final(role: Role, event: &Value) -> DecodedEvent {
    match (extract_id(event), extract_text(event)) {
        (Some(id), Some(text)) => DecodedEvent::TranscriptFinal {
            role,
            id,
            text: text.trim().to_string(),
        },
        _ => DecodedEvent::Ignored,
    }
}

/// Extracts a correlation id, trying in order: the response-level id
/// (`response_id`, then `response.id`), the item-level id (`item_id`), then
/// an embedded item object's id (`item.id`). First non-empty string wins.
fn extract_id(event: &Value) -> Option<String> {
    non_empty_str(event.get("response_id"))
        .or_else(|| non_empty_str(event.get("response").and_then(|r| r.get("id"))))
        .or_else(|| non_empty_str(event.get("item_id")))
        .or_else(|| non_empty_str(event.get("item").and_then(|i| i.get("id"))))
}

/// Acknowledgment matching additionally accepts a correlation id the client
/// stashed in the embedded item's metadata.
fn extract_ack_id(event: &Value) -> Option<String> {
    extract_id(event).or_else(|| {
        non_empty_str(
            event
                .get("item")
                .and_then(|i| i.get("metadata"))
                .and_then(|m| m.get("correlation_id")),
        )
    })
}

/// Extracts text, trying in order: `delta`, `text`, `transcript`, then the
/// embedded item's `text`/`transcript`. First string that is non-empty
/// after trimming wins; the value is returned untrimmed so delta fragments
/// concatenate exactly as sent.
fn extract_text(event: &Value) -> Option<String> {
    non_empty_str(event.get("delta"))
        .or_else(|| non_empty_str(event.get("text")))
        .or_else(|| non_empty_str(event.get("transcript")))
        .or_else(|| non_empty_str(event.get("item").and_then(|i| i.get("text"))))
        .or_else(|| non_empty_str(event.get("item").and_then(|i| i.get("transcript"))))
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(ToString::to_string)
}

/// The canonical transcript, ordered most-recent-first.
///
/// Invariants: at most one non-final item per id; finalization is
/// monotonic; every update moves the touched item to the front.
#[derive(Debug, Default)]
pub struct TranscriptStore {
    items: Vec<TranscriptItem>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items most-recent-first.
    pub fn items(&self) -> &[TranscriptItem] {
        &self.items
    }

    /// Applies a decoded transcript instruction. Non-transcript
    /// instructions are no-ops here.
    pub fn apply(&mut self, event: &DecodedEvent) {
        match event {
            DecodedEvent::TranscriptDelta { role, id, fragment } => {
                self.apply_delta(*role, id, fragment);
            }
            DecodedEvent::TranscriptFinal { role, id, text } => {
                self.apply_final(*role, id, text);
            }
            _ => {}
        }
    }

    /// Appends a fragment to the non-final item with this id, creating one
    /// if none exists. Deltas arriving after a final for the same id are
    /// dropped: finals are terminal.
    pub fn apply_delta(&mut self, role: Role, id: &str, fragment: &str) {
        if let Some(position) = self.items.iter().position(|item| item.id == id) {
            if self.items[position].is_final {
                debug!(id, "Dropping delta for finalized transcript item");
                return;
            }
            let mut item = self.items.remove(position);
            item.text.push_str(fragment);
            self.items.insert(0, item);
        } else {
            self.items.insert(
                0,
                TranscriptItem::partial(id.to_string(), role, fragment.to_string()),
            );
        }
    }

    /// Finalizes the item with this id, replacing its accumulated text.
    /// An existing item keeps its previously observed role; otherwise a new
    /// final item is created with the supplied role hint.
    pub fn apply_final(&mut self, role_hint: Role, id: &str, text: &str) {
        let trimmed = text.trim();
        if let Some(position) = self.items.iter().position(|item| item.id == id) {
            let mut item = self.items.remove(position);
            item.text = trimmed.to_string();
            item.is_final = true;
            self.items.insert(0, item);
        } else {
            self.items.insert(
                0,
                TranscriptItem::finalized(id.to_string(), role_hint, trimmed.to_string()),
            );
        }
    }

    /// Count of finalized user turns, the unit the phase engine measures
    /// stall thresholds in.
    pub fn user_turns(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.role == Role::User && item.is_final)
            .count()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
