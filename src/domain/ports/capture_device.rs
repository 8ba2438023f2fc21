//! Local capture device port.
//!
//! The capture stream is exclusively owned by the session manager for the
//! lifetime of one connection; no other component touches its tracks.

use async_trait::async_trait;

use crate::domain::errors::TransportError;

/// A live local capture track (microphone audio).
pub trait CaptureTrack: Send {
    /// Enables or disables the track without renegotiating the transport.
    fn set_enabled(&mut self, enabled: bool);

    /// Current enablement state.
    fn is_enabled(&self) -> bool;

    /// Stops the track and releases the device.
    fn stop(&mut self);
}

/// Source of local capture tracks.
///
/// Permission denial must surface as [`TransportError::PermissionDenied`]
/// so the caller can show a user-actionable message; any other failure is
/// [`TransportError::CaptureFailure`].
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn CaptureTrack>, TransportError>;
}
