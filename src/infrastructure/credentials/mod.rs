//! HTTP adapter for the short-lived credential issuer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::debug;

use crate::domain::errors::TransportError;
use crate::domain::models::SessionConfig;
use crate::domain::ports::{Credential, CredentialIssuer};

/// HTTP client for the token-issuing collaborator.
///
/// Exchanges a session configuration for a short-lived credential scoped
/// to one realtime session. No caching: credentials expire quickly enough
/// that every connect requests a fresh one.
pub struct HttpCredentialIssuer {
    http_client: ReqwestClient,
    endpoint: String,
}

impl HttpCredentialIssuer {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| TransportError::CredentialFailure(err.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }
}

/// Credential issuer double that always returns the same token, or always
/// fails. Used by tests and demos in place of a live issuer.
pub struct StaticCredentialIssuer {
    credential: Option<Credential>,
}

impl StaticCredentialIssuer {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            credential: Some(Credential {
                value: value.into(),
                expires_at: chrono::Utc::now() + chrono::Duration::minutes(1),
            }),
        }
    }

    /// An issuer whose requests always fail.
    pub fn failing() -> Self {
        Self { credential: None }
    }
}

#[async_trait]
impl CredentialIssuer for StaticCredentialIssuer {
    async fn request_credential(
        &self,
        _config: &SessionConfig,
    ) -> Result<Credential, TransportError> {
        self.credential.clone().ok_or_else(|| {
            TransportError::CredentialFailure("issuer unavailable".to_string())
        })
    }
}

#[async_trait]
impl CredentialIssuer for HttpCredentialIssuer {
    async fn request_credential(
        &self,
        config: &SessionConfig,
    ) -> Result<Credential, TransportError> {
        debug!(endpoint = %self.endpoint, "Requesting session credential");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(config)
            .send()
            .await
            .map_err(|err| TransportError::CredentialFailure(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::CredentialFailure(format!(
                "issuer returned {status}: {body}"
            )));
        }

        response
            .json::<Credential>()
            .await
            .map_err(|err| TransportError::CredentialFailure(err.to_string()))
    }
}
