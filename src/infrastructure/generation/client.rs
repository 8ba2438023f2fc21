//! HTTP client for the content-generation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use tracing::{debug, warn};

use crate::domain::errors::GenerationError;
use crate::domain::models::{GenerationConfig, SuggestionCandidate};
use crate::domain::ports::{CardGenerator, CardRequest};

/// HTTP client for the content-generation service.
///
/// One request per generation attempt; retries are owned by the suggestion
/// engine's budget, not the client. Construction fails fast when no API
/// key is configured at all, which is the single hard configuration error
/// the suggestion path can surface.
pub struct HttpCardGenerator {
    http_client: ReqwestClient,
    base_url: String,
    api_key: String,
}

impl HttpCardGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn handle_response(
        &self,
        response: Response,
    ) -> Result<SuggestionCandidate, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            return Err(self.classify_error(status, response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| {
            debug!(error = %err, "Generation response was not a parseable card");
            GenerationError::MalformedResponse(err.to_string())
        })
    }

    async fn classify_error(&self, status: StatusCode, response: Response) -> GenerationError {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());

        warn!(%status, "Generation service error: {body}");

        match status {
            StatusCode::BAD_REQUEST => GenerationError::InvalidRequest(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited,
            status => GenerationError::ServerError {
                status: status.as_u16(),
                body,
            },
        }
    }
}

#[async_trait]
impl CardGenerator for HttpCardGenerator {
    async fn generate_card(
        &self,
        request: &CardRequest,
    ) -> Result<SuggestionCandidate, GenerationError> {
        let url = format!("{}/cards", self.base_url);
        debug!(tier = ?request.tier, "POST {url}");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
