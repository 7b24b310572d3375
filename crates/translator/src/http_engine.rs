//! HTTP translation engine speaking the LibreTranslate wire protocol.

use chat_core::{async_trait, EngineError, TranslationEngine};
use reqwest::Client;
use tracing::debug;

use crate::api_types::{ApiError, DetectCandidate, DetectRequest, TranslateRequest, TranslateResponse};
use crate::config::TranslatorConfig;
use crate::error::TranslatorError;

/// A translation engine backed by a LibreTranslate-compatible HTTP API.
pub struct HttpEngine {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpEngine {
    /// Create a new engine from the translator configuration.
    pub fn new(config: &TranslatorConfig) -> Result<Self, TranslatorError> {
        let client = Client::builder().build().map_err(|e| {
            TranslatorError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Create an engine from environment variables.
    ///
    /// See [`TranslatorConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, TranslatorError> {
        let config = TranslatorConfig::from_env()?;
        Self::new(&config)
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, EngineError> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::Timeout
                } else {
                    EngineError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as a structured API error first.
            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error,
                Err(_) => error_text,
            };

            return Err(EngineError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl TranslationEngine for HttpEngine {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, EngineError> {
        let request = TranslateRequest::new(text, source, target, self.api_key.as_deref());
        debug!("Sending translate request: {} -> {}", source, target);

        let response = self.post_json("/translate", &request).await?;

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| EngineError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        Ok(body.translated_text)
    }

    async fn detect(&self, text: &str) -> Result<String, EngineError> {
        let request = DetectRequest {
            q: text.to_string(),
            api_key: self.api_key.clone(),
        };

        let response = self.post_json("/detect", &request).await?;

        let candidates: Vec<DetectCandidate> = response
            .json()
            .await
            .map_err(|e| EngineError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        // Candidates are expected ordered by confidence, but don't rely on it.
        candidates
            .into_iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .map(|c| c.language)
            .ok_or_else(|| EngineError::MalformedResponse("empty detect response".to_string()))
    }

    fn name(&self) -> &str {
        "HttpEngine"
    }
}
