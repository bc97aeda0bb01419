/// Provider-agnostic embedding trait for generating vectors from text.
use async_trait::async_trait;

use crate::error::EmbeddingError;

/// Chunk size used when a provider does not declare its own limit.
pub const DEFAULT_BATCH_LIMIT: usize = 10;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts.
    ///
    /// Returns one vector per input text, in input order. Implementations
    /// must not reorder or drop entries; batching above the provider's
    /// limit is the caller's job.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// The provider's canonical name (e.g. "elastic").
    fn provider_name(&self) -> &'static str;

    /// Maximum number of texts the provider accepts in one request.
    fn batch_limit(&self) -> usize {
        DEFAULT_BATCH_LIMIT
    }
}
