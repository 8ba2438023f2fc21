//! Credential issuer port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::TransportError;
use crate::domain::models::SessionConfig;

/// A short-lived access credential scoped to a single realtime session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Opaque token value presented to the peer transport.
    pub value: String,

    /// Expiry of the token; the issuer keeps these short-lived.
    pub expires_at: DateTime<Utc>,
}

/// Token-issuing collaborator that exchanges a session configuration for a
/// short-lived credential.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    async fn request_credential(
        &self,
        config: &SessionConfig,
    ) -> Result<Credential, TransportError>;
}
