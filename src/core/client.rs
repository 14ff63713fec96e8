//! HTTP translation engine with retry logic

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::config::EngineConfig;
use crate::core::engine::TranslationEngine;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::ModelPair;

/// Longest wait between two attempts
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Delay before retry number `attempt` (1-based): `base_ms * 2^(attempt - 1)`, capped
fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 2_u64.checked_pow(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor)).min(MAX_BACKOFF)
}

/// Engine that forwards each hop to a remote model-serving endpoint
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: reqwest::Client,
    config: Arc<EngineConfig>,
    semaphore: Arc<Semaphore>,
}

impl HttpEngine {
    /// Create a new HTTP engine
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        let semaphore = Arc::new(Semaphore::new(config.max_concurrent));

        Ok(Self {
            client,
            config: Arc::new(config),
            semaphore,
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        Self::new(EngineConfig::from_env()?)
    }

    /// Run one hop, retrying transient failures with exponential backoff
    async fn translate_with_model(&self, model: &ModelPair, text: &str) -> Result<String> {
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                debug!("Retry attempt {} for model {}", attempt, model.model);
                sleep(backoff_delay(self.config.retry_delay_ms, attempt)).await;
            }

            match self.send_request(model, text).await {
                Ok(translation) => {
                    if attempt > 0 {
                        info!("Successfully translated after {} retries", attempt);
                    }
                    return Ok(translation);
                }
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    warn!("Model {} failed: {}", model.model, e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Send actual HTTP request
    async fn send_request(&self, model: &ModelPair, text: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": model.model,
            "input": [{
                "role": "user",
                "content": [{
                    "type": "input_text",
                    "text": text,
                    "translation_options": {
                        "source_language": model.source,
                        "target_language": model.target
                    }
                }]
            }]
        });

        let mut request = self
            .client
            .post(&self.config.api_endpoint)
            .header("Content-Type", "application/json")
            .json(&body);

        if !self.config.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.config.api_key));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TranslationError::TimeoutError
            } else {
                TranslationError::NetworkError {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();

        if status.is_success() {
            let json: serde_json::Value =
                response
                    .json()
                    .await
                    .map_err(|e| TranslationError::InvalidResponseError {
                        message: e.to_string(),
                    })?;

            let translation = json["output"]["choices"]
                .get(0)
                .and_then(|c| c["message"]["content"].as_str())
                .ok_or_else(|| TranslationError::InvalidResponseError {
                    message: "No translation in response".to_string(),
                })?
                .to_string();

            Ok(translation)
        } else {
            let status_code = status.as_u16();

            if status_code == 429 {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok());
                return Err(TranslationError::RateLimitError { retry_after });
            }

            let error_text = response.text().await.unwrap_or_default();

            Err(TranslationError::ApiError {
                status: status_code,
                message: error_text,
            })
        }
    }
}

#[async_trait]
impl TranslationEngine for HttpEngine {
    async fn translate(&self, model: &ModelPair, text: &str) -> Result<String> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| TranslationError::InternalError(e.to_string()))?;

        self.translate_with_model(model, text).await
    }

    fn name(&self) -> &str {
        "http"
    }
}
