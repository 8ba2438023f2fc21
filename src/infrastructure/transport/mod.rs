//! Transport adapters.
//!
//! The production peer transport (a WebRTC stack) lives outside this crate
//! behind the [`PeerTransport`](crate::domain::ports::PeerTransport) port.
//! This module provides the in-memory loopback implementation used by
//! tests and demos.

mod loopback;

pub use loopback::{LoopbackHandle, LoopbackTransport, StubCaptureDevice, StubCaptureTrack};
