//! Public facade: pseudo-vector mode or one remote provider, fixed at
//! construction.

use std::sync::Arc;

use crate::{
    config::{EmbeddingSettings, Provider, ProviderConfig},
    embeddings::EmbeddingProvider,
    embeddings_batch::embed_chunked,
    embeddings_cohere::CohereEmbeddingProvider,
    embeddings_elastic::ElasticEmbeddingProvider,
    embeddings_fallback::{DEFAULT_DIMS, pseudo_vector},
    embeddings_openai::OpenAiEmbeddingProvider,
    error::EmbeddingError,
    retry::{RetryPolicy, Sleeper, TokioSleeper},
};

enum Mode {
    Pseudo {
        dims: usize,
    },
    Remote {
        adapter: Box<dyn EmbeddingProvider>,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    },
}

/// Generates embeddings via a configured provider, or deterministic
/// pseudo-vectors when none is selected. Immutable once built.
pub struct EmbeddingGenerator {
    mode: Mode,
}

impl std::fmt::Debug for EmbeddingGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.mode {
            Mode::Pseudo { .. } => "Pseudo",
            Mode::Remote { .. } => "Remote",
        };
        f.debug_struct("EmbeddingGenerator")
            .field("mode", &mode)
            .finish()
    }
}

impl EmbeddingGenerator {
    /// Offline mode: deterministic pseudo-vectors of the given dimension.
    #[must_use]
    pub fn pseudo(dims: usize) -> Self {
        Self {
            mode: Mode::Pseudo { dims },
        }
    }

    /// Provider mode with validated credentials.
    #[must_use]
    pub fn with_provider(config: ProviderConfig) -> Self {
        let adapter: Box<dyn EmbeddingProvider> = match config {
            ProviderConfig::Elastic { base_url, api_key } => {
                Box::new(ElasticEmbeddingProvider::new(base_url, api_key))
            }
            ProviderConfig::OpenAi { api_key } => Box::new(OpenAiEmbeddingProvider::new(api_key)),
            ProviderConfig::Cohere { api_key } => Box::new(CohereEmbeddingProvider::new(api_key)),
        };
        Self::from_adapter(adapter)
    }

    /// Provider mode around an already-built adapter.
    #[must_use]
    pub fn from_adapter(adapter: Box<dyn EmbeddingProvider>) -> Self {
        Self {
            mode: Mode::Remote {
                adapter,
                policy: RetryPolicy::default(),
                sleeper: Arc::new(TokioSleeper),
            },
        }
    }

    /// Resolve raw settings: empty provider selection means pseudo mode,
    /// otherwise the name must parse and its credentials must be present.
    /// Fails before any network activity.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self, EmbeddingError> {
        let name = settings.provider.as_deref().map(str::trim).unwrap_or("");
        if name.is_empty() {
            return Ok(Self::pseudo(settings.pseudo_dims));
        }

        let provider: Provider = name.parse()?;
        let config = settings.provider_config(provider)?;
        Ok(Self::with_provider(config).with_retry_policy(RetryPolicy {
            max_retries: settings.max_retries,
            base_delay: settings.base_delay,
        }))
    }

    #[must_use]
    pub fn with_retry_policy(mut self, new_policy: RetryPolicy) -> Self {
        if let Mode::Remote { policy, .. } = &mut self.mode {
            *policy = new_policy;
        }
        self
    }

    #[must_use]
    pub fn with_sleeper(mut self, new_sleeper: Arc<dyn Sleeper>) -> Self {
        if let Mode::Remote { sleeper, .. } = &mut self.mode {
            *sleeper = new_sleeper;
        }
        self
    }

    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        match &self.mode {
            Mode::Pseudo { .. } => "pseudo",
            Mode::Remote { adapter, .. } => adapter.provider_name(),
        }
    }

    /// Generate an embedding for a single text.
    ///
    /// Provider mode sends a single-element batch straight to the adapter;
    /// only batch calls go through retry.
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.mode {
            Mode::Pseudo { dims } => Ok(pseudo_vector(text, *dims)),
            Mode::Remote { adapter, .. } => {
                let texts = [text.to_string()];
                adapter
                    .embed_batch(&texts)
                    .await?
                    .pop()
                    .ok_or(EmbeddingError::EmptyResponse {
                        provider: adapter.provider_name(),
                    })
            }
        }
    }

    /// Generate embeddings for a list of texts, auto-chunked to the
    /// provider's batch limit. Pseudo mode maps every text without chunking.
    pub async fn generate_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        match &self.mode {
            Mode::Pseudo { dims } => Ok(texts.iter().map(|t| pseudo_vector(t, *dims)).collect()),
            Mode::Remote {
                adapter,
                policy,
                sleeper,
            } => embed_chunked(adapter.as_ref(), policy, sleeper.as_ref(), texts).await,
        }
    }
}

impl Default for EmbeddingGenerator {
    fn default() -> Self {
        Self::pseudo(DEFAULT_DIMS)
    }
}
