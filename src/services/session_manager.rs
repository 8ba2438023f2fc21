//! Realtime transport session manager.
//!
//! Owns the live connection to the conversational inference service:
//! credential exchange, peer transport negotiation, data-channel lifecycle,
//! outbound queueing, and acknowledgment correlation. One instance per
//! session; the pending-acknowledgment map and outbound queue are private
//! to the instance and never shared across sessions.
//!
//! All state mutation happens in response to discrete events processed one
//! at a time, so the manager is single-threaded from the caller's
//! perspective. It never reconnects on its own: callers decide whether and
//! when to retry after a failure.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::errors::{AckError, TransportError};
use crate::domain::models::{SessionConfig, TranscriptItem};
use crate::domain::ports::{
    CaptureDevice, CaptureTrack, ConnectionState, CredentialIssuer, MediaDirection, PeerTransport,
    TransportEvent,
};
use crate::services::transcript_decoder::{decode_event, DecodedEvent, TranscriptStore};

/// Lifecycle status of a realtime session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No connection; the starting and post-disconnect state.
    Idle,
    /// Exchanging the session config for a short-lived credential.
    RequestingCredential,
    /// Credential obtained; negotiating the peer transport.
    Connecting,
    /// Transport reports connected; the session is live.
    Connected,
    /// Something failed; see [`RealtimeSession::error`] for the message.
    Error,
}

/// One-shot handle for an acknowledgment wait.
///
/// Resolves `Ok(())` when a matching acknowledgment event arrives,
/// `Err(Superseded)` when a later wait for the same id replaced this one,
/// and `Err(NotAcknowledged)` when the transport tears down first.
pub struct AckWaiter {
    rx: oneshot::Receiver<Result<(), AckError>>,
}

impl AckWaiter {
    pub async fn wait(self) -> Result<(), AckError> {
        match self.rx.await {
            Ok(outcome) => outcome,
            // Sender dropped without resolving: a later caller replaced us.
            Err(_) => Err(AckError::Superseded),
        }
    }
}

/// The realtime session manager.
pub struct RealtimeSession {
    issuer: Arc<dyn CredentialIssuer>,
    capture_device: Option<Arc<dyn CaptureDevice>>,
    transport: Box<dyn PeerTransport>,

    status: SessionStatus,
    error: Option<String>,
    transcripts: TranscriptStore,

    /// Messages submitted before the data channel opened, flushed FIFO the
    /// instant it does.
    outbound: VecDeque<String>,

    /// Outstanding acknowledgment waits keyed by correlation id.
    pending_acks: HashMap<String, oneshot::Sender<Result<(), AckError>>>,

    /// Start times for in-flight generations, keyed by response id.
    response_started: HashMap<String, Instant>,
    last_latency_ms: Option<u64>,

    capture_track: Option<Box<dyn CaptureTrack>>,
    events: Option<mpsc::UnboundedReceiver<TransportEvent>>,
}

impl RealtimeSession {
    pub fn new(
        issuer: Arc<dyn CredentialIssuer>,
        transport: Box<dyn PeerTransport>,
        capture_device: Option<Arc<dyn CaptureDevice>>,
    ) -> Self {
        Self {
            issuer,
            capture_device,
            transport,
            status: SessionStatus::Idle,
            error: None,
            transcripts: TranscriptStore::new(),
            outbound: VecDeque::new(),
            pending_acks: HashMap::new(),
            response_started: HashMap::new(),
            last_latency_ms: None,
            capture_track: None,
            events: None,
        }
    }

    // ========================================================================
    // Exposed state
    // ========================================================================

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The failure message accompanying [`SessionStatus::Error`].
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Transcript items, most-recent-first.
    pub fn transcripts(&self) -> &[TranscriptItem] {
        self.transcripts.items()
    }

    /// Elapsed milliseconds of the most recently completed generation.
    pub fn last_latency_ms(&self) -> Option<u64> {
        self.last_latency_ms
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Establishes the session: credential exchange, capture acquisition,
    /// then transport negotiation. Idempotent while a connection attempt is
    /// already underway or live.
    pub async fn connect(&mut self, config: &SessionConfig) -> Result<(), TransportError> {
        if matches!(
            self.status,
            SessionStatus::RequestingCredential | SessionStatus::Connecting | SessionStatus::Connected
        ) {
            debug!(status = ?self.status, "connect() is a no-op while already connecting or connected");
            return Ok(());
        }

        self.error = None;
        self.status = SessionStatus::RequestingCredential;

        let credential = match self.issuer.request_credential(config).await {
            Ok(credential) => credential,
            Err(err) => {
                self.fail(&err);
                return Err(err);
            }
        };

        if config.capture_enabled {
            match self.acquire_capture().await {
                Ok(track) => self.capture_track = Some(track),
                Err(err) => {
                    self.fail(&err);
                    return Err(err);
                }
            }
        }

        let direction = MediaDirection::from_flags(config.capture_enabled, config.playback_enabled);
        self.status = SessionStatus::Connecting;

        match self.transport.negotiate(&credential, direction).await {
            Ok(events) => {
                info!(?direction, "Transport negotiated; awaiting connection state");
                self.events = Some(events);
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Tears the session down completely: transport closed, capture track
    /// stopped, pending acknowledgments rejected, outbound queue cleared.
    /// Safe to call any number of times, from any state.
    pub fn disconnect(&mut self) {
        self.release_resources();
        self.status = SessionStatus::Idle;
        self.error = None;
        debug!("Session disconnected");
    }

    /// Awaits and handles the next transport event. Returns `false` when
    /// no event source exists or the transport closed its event stream.
    pub async fn drive_once(&mut self) -> bool {
        let Some(mut events) = self.events.take() else {
            return false;
        };
        match events.recv().await {
            Some(event) => {
                self.events = Some(events);
                self.handle_transport_event(event);
                true
            }
            None => {
                debug!("Transport event stream ended");
                false
            }
        }
    }

    // ========================================================================
    // Outbound path
    // ========================================================================

    /// Serializes and transmits an event, or queues it FIFO until the data
    /// channel opens. Never suspends and never silently drops a message.
    pub fn send_event(&mut self, event: &serde_json::Value) {
        let payload = event.to_string();
        if self.transport.channel_open() {
            if let Err(err) = self.transport.send(&payload) {
                warn!(error = %err, "Send failed on open channel; queueing message");
                self.outbound.push_back(payload);
            }
        } else {
            self.outbound.push_back(payload);
        }
    }

    /// Registers an acknowledgment wait for `id`. A second wait for the
    /// same id replaces the first: last caller wins, and the abandoned
    /// waiter resolves with [`AckError::Superseded`].
    pub fn wait_for_acknowledgment(&mut self, id: &str) -> AckWaiter {
        let (tx, rx) = oneshot::channel();
        if self.pending_acks.insert(id.to_string(), tx).is_some() {
            debug!(id, "Replacing existing acknowledgment wait");
        }
        AckWaiter { rx }
    }

    // ========================================================================
    // Microphone control
    // ========================================================================

    /// Disables the local capture track without renegotiating. No effect
    /// when no capture track exists.
    pub fn pause_microphone(&mut self) {
        if let Some(track) = self.capture_track.as_mut() {
            track.set_enabled(false);
        }
    }

    /// Re-enables the local capture track. No effect without a track.
    pub fn resume_microphone(&mut self) {
        if let Some(track) = self.capture_track.as_mut() {
            track.set_enabled(true);
        }
    }

    /// True when a capture track exists and is currently enabled.
    pub fn microphone_active(&self) -> bool {
        self.capture_track.as_ref().is_some_and(|t| t.is_enabled())
    }

    // ========================================================================
    // Event handling
    // ========================================================================

    /// Single dispatch point for transport events.
    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::ChannelOpen => self.flush_outbound(),
            TransportEvent::ChannelMessage(raw) => self.handle_message(&raw),
            TransportEvent::StateChanged(state) => self.handle_state_change(state),
            TransportEvent::RemoteTrack => debug!("Remote media track available"),
        }
    }

    fn handle_state_change(&mut self, state: ConnectionState) {
        match state {
            ConnectionState::Connected => {
                info!("Transport connected");
                self.status = SessionStatus::Connected;
            }
            ConnectionState::Failed | ConnectionState::Disconnected => {
                let err = TransportError::ConnectionFailure(format!(
                    "transport reported {state:?}"
                ));
                warn!(error = %err, "Transport lost");
                self.fail(&err);
            }
            ConnectionState::New | ConnectionState::Connecting | ConnectionState::Closed => {
                debug!(?state, "Transport state changed");
            }
        }
    }

    fn handle_message(&mut self, raw: &str) {
        match decode_event(raw) {
            event @ (DecodedEvent::TranscriptDelta { .. } | DecodedEvent::TranscriptFinal { .. }) => {
                self.transcripts.apply(&event);
            }
            DecodedEvent::Acknowledgment { id } => {
                if let Some(tx) = self.pending_acks.remove(&id) {
                    let _ = tx.send(Ok(()));
                }
            }
            DecodedEvent::ResponseStarted { response_id } => {
                self.response_started.insert(response_id, Instant::now());
            }
            DecodedEvent::ResponseCompleted { response_id } => {
                // One-shot sample: the start time is dropped once measured.
                if let Some(started) = self.response_started.remove(&response_id) {
                    let elapsed =
                        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                    debug!(response_id, latency_ms = elapsed, "Generation completed");
                    self.last_latency_ms = Some(elapsed);
                }
            }
            DecodedEvent::Ignored => {}
        }
    }

    fn flush_outbound(&mut self) {
        debug!(queued = self.outbound.len(), "Data channel open; flushing outbound queue");
        while let Some(payload) = self.outbound.pop_front() {
            if let Err(err) = self.transport.send(&payload) {
                warn!(error = %err, "Flush interrupted; re-queueing message");
                self.outbound.push_front(payload);
                break;
            }
        }
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    async fn acquire_capture(&mut self) -> Result<Box<dyn CaptureTrack>, TransportError> {
        let Some(device) = self.capture_device.as_ref() else {
            return Err(TransportError::CaptureFailure(
                "capture enabled but no capture device configured".to_string(),
            ));
        };
        device.acquire().await
    }

    fn fail(&mut self, err: &TransportError) {
        self.error = Some(err.to_string());
        self.status = SessionStatus::Error;
        self.release_resources();
    }

    fn release_resources(&mut self) {
        self.transport.close();
        self.events = None;
        self.outbound.clear();
        self.response_started.clear();

        if let Some(mut track) = self.capture_track.take() {
            track.stop();
        }

        for (_, tx) in self.pending_acks.drain() {
            let _ = tx.send(Err(AckError::NotAcknowledged));
        }
    }
}

impl Drop for RealtimeSession {
    fn drop(&mut self) {
        self.release_resources();
    }
}
