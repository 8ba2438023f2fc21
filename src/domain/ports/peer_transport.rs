//! Peer transport port.
//!
//! Abstracts the live bidirectional connection (offer/answer negotiation,
//! connection-state reporting, and a string data channel). The session
//! manager consumes transport events one at a time from the receiver the
//! negotiation returns; implementations must never deliver events
//! concurrently with each other.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::credential_issuer::Credential;
use crate::domain::errors::TransportError;

/// Media direction negotiated for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaDirection {
    /// Capture and playback both enabled.
    SendRecv,
    /// Capture only.
    SendOnly,
    /// Playback only, or a text-only session.
    RecvOnly,
}

impl MediaDirection {
    /// Computes direction from the session's media flags.
    pub fn from_flags(capture_enabled: bool, playback_enabled: bool) -> Self {
        match (capture_enabled, playback_enabled) {
            (true, true) => Self::SendRecv,
            (true, false) => Self::SendOnly,
            (false, _) => Self::RecvOnly,
        }
    }
}

/// Connection state as reported by the underlying transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// An event surfaced by the peer transport.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The data channel is open and ready to carry messages.
    ChannelOpen,

    /// An inbound data-channel payload (expected to be JSON text).
    ChannelMessage(String),

    /// The transport's connection state changed.
    StateChanged(ConnectionState),

    /// A remote media track became available (playback-enabled sessions).
    RemoteTrack,
}

/// The live peer connection.
#[async_trait]
pub trait PeerTransport: Send {
    /// Performs offer/answer negotiation using the supplied credential and
    /// returns the receiver the session manager drains transport events
    /// from.
    async fn negotiate(
        &mut self,
        credential: &Credential,
        direction: MediaDirection,
    ) -> Result<mpsc::UnboundedReceiver<TransportEvent>, TransportError>;

    /// True when the data channel is open for sending.
    fn channel_open(&self) -> bool;

    /// Transmits a payload over the data channel. Fire-and-forget: never
    /// suspends.
    fn send(&self, payload: &str) -> Result<(), TransportError>;

    /// Closes the connection and releases transport resources. Safe to
    /// call more than once.
    fn close(&mut self);
}
