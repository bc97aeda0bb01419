/// OpenAI embeddings provider using the `/v1/embeddings` endpoint.
use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use crate::{embeddings::EmbeddingProvider, error::EmbeddingError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const MODEL: &str = "text-embedding-3-large";

/// Requested output dimensionality, kept in line with the other providers.
const DIMENSIONS: u32 = 384;

const BATCH_LIMIT: usize = 100;

pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    api_key: Secret<String>,
    base_url: String,
}

impl OpenAiEmbeddingProvider {
    #[must_use]
    pub fn new(api_key: Secret<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest {
    input: Vec<String>,
    model: String,
    dimensions: u32,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        debug!(texts = texts.len(), "requesting openai embeddings");

        let req = EmbeddingRequest {
            input: texts.to_vec(),
            model: MODEL.to_string(),
            dimensions: DIMENSIONS,
        };

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&req)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(EmbeddingError::Http {
                provider: "openai",
                status,
                body,
            });
        }

        let parsed: EmbeddingResponse =
            serde_json::from_str(&body).map_err(|e| EmbeddingError::malformed("openai", &e))?;
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn batch_limit(&self) -> usize {
        BATCH_LIMIT
    }
}

#[cfg(test)]
mod tests {
    use {mockito::Matcher, reqwest::StatusCode, serde_json::json};

    use super::*;

    fn provider(server: &mockito::Server) -> OpenAiEmbeddingProvider {
        OpenAiEmbeddingProvider::new(Secret::new("sk-test".into())).with_base_url(server.url())
    }

    #[tokio::test]
    async fn test_wire_shape_and_vector_extraction() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/embeddings")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(json!({
                "input": ["first", "second"],
                "model": "text-embedding-3-large",
                "dimensions": 384
            })))
            .with_status(200)
            .with_body(
                json!({
                    "data": [
                        {"embedding": [0.5, 0.6]},
                        {"embedding": [0.7, 0.8]}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = provider(&server)
            .embed_batch(&["first".into(), "second".into()])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec![vec![0.5, 0.6], vec![0.7, 0.8]]);
    }

    #[tokio::test]
    async fn test_auth_failure_is_permanent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/embeddings")
            .with_status(401)
            .with_body(json!({"error": {"message": "bad key"}}).to_string())
            .create_async()
            .await;

        let err = provider(&server)
            .embed_batch(&["text".into()])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EmbeddingError::Http {
                provider: "openai",
                status: StatusCode::UNAUTHORIZED,
                ..
            }
        ));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_missing_data_field_is_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/embeddings")
            .with_status(200)
            .with_body(json!({"object": "list"}).to_string())
            .create_async()
            .await;

        let err = provider(&server)
            .embed_batch(&["text".into()])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EmbeddingError::MalformedResponse {
                provider: "openai",
                ..
            }
        ));
    }
}
