//! Elasticsearch inference-endpoint embeddings provider.
use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use crate::{embeddings::EmbeddingProvider, error::EmbeddingError};

/// Inference endpoint id provisioned alongside the search indices.
const MODEL_ID: &str = "vigil-embedding-model";

/// Elastic caps inference requests at 10 inputs.
const BATCH_LIMIT: usize = 10;

pub struct ElasticEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Secret<String>,
}

impl ElasticEmbeddingProvider {
    #[must_use]
    pub fn new(base_url: String, api_key: Secret<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[derive(Serialize)]
struct InferenceRequest {
    input: Vec<String>,
}

#[derive(Deserialize)]
struct InferenceResponse {
    text_embedding: Vec<InferenceEmbedding>,
}

#[derive(Deserialize)]
struct InferenceEmbedding {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for ElasticEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        debug!(texts = texts.len(), "requesting elastic embeddings");

        let url = format!("{}/_inference/text_embedding/{MODEL_ID}", self.base_url);
        let req = InferenceRequest {
            input: texts.to_vec(),
        };

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("ApiKey {}", self.api_key.expose_secret()),
            )
            .json(&req)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(EmbeddingError::Http {
                provider: "elastic",
                status,
                body,
            });
        }

        let parsed: InferenceResponse =
            serde_json::from_str(&body).map_err(|e| EmbeddingError::malformed("elastic", &e))?;
        Ok(parsed
            .text_embedding
            .into_iter()
            .map(|item| item.embedding)
            .collect())
    }

    fn provider_name(&self) -> &'static str {
        "elastic"
    }

    fn batch_limit(&self) -> usize {
        BATCH_LIMIT
    }
}
