//! API-based embedding provider (OpenAI-compatible).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::EmbeddingConfig;
use crate::error::{EmbeddingError, Result};

use super::EmbeddingProvider;

/// Embedding provider talking to an OpenAI-compatible `/embeddings`
/// endpoint.
pub struct ApiEmbeddingProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    dimension: usize,
    max_batch_size: usize,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl ApiEmbeddingProvider {
    /// Build a provider from configuration, falling back to the
    /// `OPENAI_API_KEY` environment variable when no key is configured.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                EmbeddingError::Api(
                    "API key not configured and OPENAI_API_KEY env var not set".to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            dimension: Self::model_dimension(&config.model),
            max_batch_size: config.batch_size,
        })
    }

    fn model_dimension(model: &str) -> usize {
        match model {
            "text-embedding-3-large" => 3072,
            "text-embedding-3-small" | "text-embedding-ada-002" => 1536,
            "embed-multilingual-v3.0" => 1024,
            _ => 1536,
        }
    }

    async fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            encoding_format: "float",
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::Api("Request timed out".to_string())
                } else {
                    EmbeddingError::Api(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(EmbeddingError::RateLimited.into());
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(EmbeddingError::Api(format!("API error ({}): {}", status, message)).into());
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Api(format!("Failed to parse response: {}", e)))?;

        // The API may return rows out of order.
        let mut rows = result.data;
        rows.sort_by_key(|r| r.index);
        Ok(rows.into_iter().map(|r| r.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for ApiEmbeddingProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        if texts.len() > self.max_batch_size {
            return Err(EmbeddingError::BatchTooLarge(texts.len(), self.max_batch_size).into());
        }
        self.request_embeddings(texts).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmbeddingConfig {
        EmbeddingConfig {
            api_key: Some("test-key".to_string()),
            ..EmbeddingConfig::default()
        }
    }

    #[test]
    fn test_model_dimension() {
        assert_eq!(ApiEmbeddingProvider::model_dimension("text-embedding-3-small"), 1536);
        assert_eq!(ApiEmbeddingProvider::model_dimension("text-embedding-3-large"), 3072);
        assert_eq!(ApiEmbeddingProvider::model_dimension("unknown-model"), 1536);
    }

    #[test]
    fn test_from_config_with_api_key() {
        let provider = ApiEmbeddingProvider::from_config(&config()).unwrap();
        assert_eq!(provider.dimension(), 1536);
        assert_eq!(provider.max_batch_size(), 100);
    }

    #[test]
    fn test_base_url_loses_trailing_slash() {
        let config = EmbeddingConfig {
            base_url: "https://api.openai.com/v1/".to_string(),
            ..config()
        };
        let provider = ApiEmbeddingProvider::from_config(&config).unwrap();
        assert!(!provider.base_url.ends_with('/'));
    }

    #[tokio::test]
    async fn test_oversized_batch_rejected() {
        let config = EmbeddingConfig {
            batch_size: 2,
            ..config()
        };
        let provider = ApiEmbeddingProvider::from_config(&config).unwrap();
        let texts: Vec<String> = (0..3).map(|i| format!("text {i}")).collect();
        let err = provider.embed(&texts).await.unwrap_err();
        assert!(err.to_string().contains("Batch too large"));
    }
}
