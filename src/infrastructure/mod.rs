//! Infrastructure layer: adapters for external collaborators.

pub mod config;
pub mod credentials;
pub mod generation;
pub mod logging;
pub mod transport;

pub use config::{ConfigError, ConfigLoader};
pub use credentials::{HttpCredentialIssuer, StaticCredentialIssuer};
pub use generation::HttpCardGenerator;
pub use transport::{LoopbackHandle, LoopbackTransport, StubCaptureDevice, StubCaptureTrack};
