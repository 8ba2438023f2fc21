//! In-memory loopback transport for testing the session manager.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::errors::TransportError;
use crate::domain::ports::{
    CaptureDevice, CaptureTrack, ConnectionState, Credential, MediaDirection, PeerTransport,
    TransportEvent,
};

/// Loopback peer transport: records outbound sends and lets a paired
/// [`LoopbackHandle`] inject inbound events.
pub struct LoopbackTransport {
    channel_open: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
    sent: Arc<Mutex<Vec<String>>>,
    events: Option<mpsc::UnboundedReceiver<TransportEvent>>,
    negotiation_error: Option<String>,
}

/// Remote-side handle for a [`LoopbackTransport`]: injects events and
/// inspects what the session sent.
#[derive(Clone)]
pub struct LoopbackHandle {
    channel_open: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
    sent: Arc<Mutex<Vec<String>>>,
    events_tx: mpsc::UnboundedSender<TransportEvent>,
}

impl LoopbackTransport {
    pub fn new() -> (Self, LoopbackHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let channel_open = Arc::new(AtomicBool::new(false));
        let closed = Arc::new(AtomicBool::new(false));
        let sent = Arc::new(Mutex::new(Vec::new()));

        let transport = Self {
            channel_open: channel_open.clone(),
            closed: closed.clone(),
            sent: sent.clone(),
            events: Some(events_rx),
            negotiation_error: None,
        };
        let handle = LoopbackHandle {
            channel_open,
            closed,
            sent,
            events_tx,
        };
        (transport, handle)
    }

    /// A transport whose negotiation always fails with the given reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        let (transport, _handle) = Self::new();
        Self {
            negotiation_error: Some(reason.into()),
            ..transport
        }
    }
}

#[async_trait]
impl PeerTransport for LoopbackTransport {
    async fn negotiate(
        &mut self,
        _credential: &Credential,
        _direction: MediaDirection,
    ) -> Result<mpsc::UnboundedReceiver<TransportEvent>, TransportError> {
        if let Some(reason) = &self.negotiation_error {
            return Err(TransportError::NegotiationFailure(reason.clone()));
        }
        self.events
            .take()
            .ok_or_else(|| TransportError::NegotiationFailure("already negotiated".to_string()))
    }

    fn channel_open(&self) -> bool {
        self.channel_open.load(Ordering::SeqCst) && !self.closed.load(Ordering::SeqCst)
    }

    fn send(&self, payload: &str) -> Result<(), TransportError> {
        if !self.channel_open() {
            return Err(TransportError::SendFailure("channel not open".to_string()));
        }
        self.sent.lock().unwrap().push(payload.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        self.channel_open.store(false, Ordering::SeqCst);
    }
}

impl LoopbackHandle {
    /// Marks the data channel open and emits the corresponding event.
    pub fn open_channel(&self) {
        self.channel_open.store(true, Ordering::SeqCst);
        let _ = self.events_tx.send(TransportEvent::ChannelOpen);
    }

    /// Reports a connection state change.
    pub fn report_state(&self, state: ConnectionState) {
        let _ = self.events_tx.send(TransportEvent::StateChanged(state));
    }

    /// Delivers an inbound data-channel payload.
    pub fn deliver(&self, payload: impl Into<String>) {
        let _ = self
            .events_tx
            .send(TransportEvent::ChannelMessage(payload.into()));
    }

    /// Payloads the session transmitted, in send order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// True once the session closed the transport.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Capture track double that records enablement and stop calls.
pub struct StubCaptureTrack {
    enabled: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl CaptureTrack for StubCaptureTrack {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.enabled.store(false, Ordering::SeqCst);
    }
}

/// Capture device double. Shared flags let tests observe the track after
/// handing it to the session.
pub struct StubCaptureDevice {
    deny_permission: bool,
    pub enabled: Arc<AtomicBool>,
    pub stopped: Arc<AtomicBool>,
}

impl StubCaptureDevice {
    pub fn new() -> Self {
        Self {
            deny_permission: false,
            enabled: Arc::new(AtomicBool::new(true)),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A device whose acquisition fails with a permission denial.
    pub fn denying() -> Self {
        Self {
            deny_permission: true,
            ..Self::new()
        }
    }
}

impl Default for StubCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureDevice for StubCaptureDevice {
    async fn acquire(&self) -> Result<Box<dyn CaptureTrack>, TransportError> {
        if self.deny_permission {
            return Err(TransportError::PermissionDenied);
        }
        Ok(Box::new(StubCaptureTrack {
            enabled: self.enabled.clone(),
            stopped: self.stopped.clone(),
        }))
    }
}
