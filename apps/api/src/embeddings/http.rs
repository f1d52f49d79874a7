//! OpenAI-compatible embeddings client.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Embedder, EmbeddingError, EmbeddingVector};
use crate::config::EmbeddingConfig;

const MAX_RETRIES: u32 = 3;

#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimension: usize,
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .context("missing embedding API key")?;
        anyhow::ensure!(!config.model.trim().is_empty(), "missing embedding model name");

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
                .context("invalid embedding API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .context("failed to build embedding HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            dimension: config.dimension,
        })
    }

    fn should_retry(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    fn retry_backoff(attempt: u32) -> Duration {
        Duration::from_millis(500 * (1 << attempt.min(5)))
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn name(&self) -> &'static str {
        "http"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: [text],
            dimensions: Some(self.dimension),
        };

        let mut attempt = 0u32;
        loop {
            let response = self.client.post(&self.endpoint).json(&request).send().await;

            let response = match response {
                Ok(r) => r,
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt + 1 < MAX_RETRIES => {
                    attempt += 1;
                    warn!("embedding request failed ({e}), retry {attempt}");
                    tokio::time::sleep(Self::retry_backoff(attempt)).await;
                    continue;
                }
                Err(e) => return Err(EmbeddingError::Http(e)),
            };

            let status = response.status();
            if status.is_success() {
                let parsed: EmbeddingResponse = response.json().await?;
                let embedding = parsed
                    .data
                    .into_iter()
                    .min_by_key(|entry| entry.index)
                    .map(|entry| entry.embedding)
                    .ok_or(EmbeddingError::Empty)?;

                if embedding.len() != self.dimension {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimension,
                        actual: embedding.len(),
                    });
                }
                debug!(dimension = embedding.len(), "embedding request succeeded");
                return Ok(embedding);
            }

            let body = response.text().await.unwrap_or_default();
            if Self::should_retry(status) && attempt + 1 < MAX_RETRIES {
                attempt += 1;
                warn!("embedding API returned {status}, retry {attempt}: {body}");
                tokio::time::sleep(Self::retry_backoff(attempt)).await;
                continue;
            }
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
