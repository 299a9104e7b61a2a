//! Answer requester for the Gemini API
//!
//! One POST per question. Every failure is classified into a [`QaError`]
//! whose rendering is what the user sees in place of an answer.

use crate::retry::RetryPolicy;
use crate::types::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use gemqa_core::{QaConfig, QaError, Result, SYSTEM_INSTRUCTION};
use std::time::Duration;
use tracing::instrument;

/// Anything that turns a finished prompt into displayable text
///
/// Never fails: errors are returned as their rendered message.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, prompt: &str) -> String;
}

/// A failed attempt plus the server's retry hint, if any
struct AttemptError {
    error: QaError,
    retry_after: Option<Duration>,
}

impl From<QaError> for AttemptError {
    fn from(error: QaError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    api_key_env: String,
    retry: RetryPolicy,
}

impl GeminiClient {
    /// Build a client from the startup configuration
    pub fn new(config: &QaConfig) -> Result<Self> {
        Self::with_timeout(config, config.timeout())
    }

    /// Build a client with an explicit request timeout
    pub fn with_timeout(config: &QaConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QaError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            api_key: config.api_key.clone(),
            api_key_env: config.api_key_env.clone(),
            retry: RetryPolicy::with_max_retries(config.max_retries),
        })
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a prompt and return the generated text
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    pub async fn ask(&self, prompt: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(QaError::MissingApiKey {
                env: self.api_key_env.clone(),
            });
        };

        let request = GenerateContentRequest::new(prompt, SYSTEM_INSTRUCTION);
        let mut retries = 0;

        loop {
            tracing::debug!("Sending request to Gemini API (attempt {})", retries + 1);

            match self.send_once(api_key, &request).await {
                Ok(answer) => {
                    tracing::info!("Received answer ({} chars)", answer.len());
                    return Ok(answer);
                }
                Err(failure) if retries < self.retry.max_retries && failure.error.is_retryable() => {
                    retries += 1;
                    let wait = self.retry.delay(retries, failure.retry_after);
                    tracing::warn!(
                        "{}. Waiting {:?} before retry {}/{}",
                        failure.error,
                        wait,
                        retries,
                        self.retry.max_retries
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(failure) => {
                    tracing::debug!("Request failed: {}", failure.error);
                    return Err(failure.error);
                }
            }
        }
    }

    async fn send_once(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> std::result::Result<String, AttemptError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::debug!("Failed to read {} error body: {}", status, e);
                String::new()
            });

            return Err(AttemptError {
                error: QaError::HttpStatus {
                    status: status.as_u16(),
                    body,
                },
                retry_after,
            });
        }

        let body = response.text().await.map_err(classify_transport_error)?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| QaError::Unexpected(format!("Failed to parse response: {}", e)))?;

        Ok(parsed.into_answer()?)
    }
}

#[async_trait]
impl Answerer for GeminiClient {
    async fn answer(&self, prompt: &str) -> String {
        self.ask(prompt).await.unwrap_or_else(|e| e.to_string())
    }
}

fn classify_transport_error(e: reqwest::Error) -> AttemptError {
    let error = if e.is_timeout() {
        QaError::Timeout
    } else if e.is_connect() {
        QaError::Connection
    } else {
        QaError::Unexpected(e.to_string())
    };
    error.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        // Port 9 (discard) on loopback; any attempt would surface as a connection error.
        let config = QaConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..QaConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();

        let answer = client.answer("anything").await;
        assert!(answer.contains("API Key not found"));
        assert!(answer.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_client_uses_config() {
        let config = QaConfig {
            model: "m1".to_string(),
            base_url: "http://example.test/v1/".to_string(),
            max_retries: 3,
            ..QaConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://example.test/v1/models/m1:generateContent");
        assert_eq!(client.retry.max_retries, 3);

        let client = client.with_retry_policy(RetryPolicy::single_attempt());
        assert_eq!(client.retry.max_retries, 0);
    }
}
