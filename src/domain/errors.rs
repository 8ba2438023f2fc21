//! Domain errors for the conversation engine.

use thiserror::Error;

/// Errors raised by the realtime transport session manager.
///
/// All of these are recoverable by a caller-initiated reconnect; the
/// session manager never retries on its own.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Credential request failed: {0}")]
    CredentialFailure(String),

    #[error("Microphone access was denied. Check browser or OS permissions and try again.")]
    PermissionDenied,

    #[error("Capture device unavailable: {0}")]
    CaptureFailure(String),

    #[error("Transport negotiation failed: {0}")]
    NegotiationFailure(String),

    #[error("Connection failed: {0}")]
    ConnectionFailure(String),

    #[error("Data channel send failed: {0}")]
    SendFailure(String),
}

/// Outcome of an acknowledgment wait that did not resolve normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AckError {
    /// A later wait for the same id replaced this one.
    #[error("acknowledgment wait superseded by a later caller")]
    Superseded,

    /// The transport tore down before the acknowledgment arrived.
    #[error("not acknowledged")]
    NotAcknowledged,
}

/// Errors from the content-generation service client.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key configured at all. The one hard error: everything else
    /// is absorbed into the suggestion engine's retry budget.
    #[error("Content-generation service API key is not configured")]
    MissingApiKey,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication failed: API key rejected")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// True when the error is a configuration problem the caller must fix,
    /// as opposed to a per-attempt failure the retry budget absorbs.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingApiKey)
    }
}
