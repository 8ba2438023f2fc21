//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the trait interfaces external collaborators must
//! implement:
//! - `CredentialIssuer`: short-lived session credential exchange
//! - `PeerTransport`: live peer connection and data channel
//! - `CaptureDevice` / `CaptureTrack`: local microphone ownership
//! - `CardGenerator`: content-generation service calls
//!
//! These traits keep the engine independent of any specific transport or
//! inference stack.

pub mod capture_device;
pub mod card_generator;
pub mod credential_issuer;
pub mod peer_transport;

pub use capture_device::{CaptureDevice, CaptureTrack};
pub use card_generator::{CardGenerator, CardRequest, VoteRecord};
pub use credential_issuer::{Credential, CredentialIssuer};
pub use peer_transport::{ConnectionState, MediaDirection, PeerTransport, TransportEvent};
