/// Cohere embeddings provider using the `/v2/embed` endpoint.
use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use crate::{embeddings::EmbeddingProvider, error::EmbeddingError};

const DEFAULT_BASE_URL: &str = "https://api.cohere.ai";
const MODEL: &str = "embed-english-v3.0";

const BATCH_LIMIT: usize = 96;

pub struct CohereEmbeddingProvider {
    client: reqwest::Client,
    api_key: Secret<String>,
    base_url: String,
}

impl CohereEmbeddingProvider {
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
struct EmbedRequest {
    texts: Vec<String>,
    model: String,
    input_type: String,
    embedding_types: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: EmbedVectors,
}

#[derive(Deserialize)]
struct EmbedVectors {
    float: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for CohereEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        debug!(texts = texts.len(), "requesting cohere embeddings");

        let req = EmbedRequest {
            texts: texts.to_vec(),
            model: MODEL.to_string(),
            input_type: "search_document".to_string(),
            embedding_types: vec!["float".to_string()],
        };

        let response = self
            .client
            .post(format!("{}/v2/embed", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&req)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(EmbeddingError::Http {
                provider: "cohere",
                status,
                body,
            });
        }

        let parsed: EmbedResponse =
            serde_json::from_str(&body).map_err(|e| EmbeddingError::malformed("cohere", &e))?;
        Ok(parsed.embeddings.float)
    }

    fn provider_name(&self) -> &'static str {
        "cohere"
    }

    fn batch_limit(&self) -> usize {
        BATCH_LIMIT
    }
}
