//! Splits oversized text lists into provider-sized chunks, preserving order.

use tracing::debug;

use crate::{
    embeddings::EmbeddingProvider,
    error::EmbeddingError,
    retry::{RetryPolicy, Sleeper, call_with_retry},
};

/// Embed `texts` through `provider`, chunked to its batch limit.
///
/// Chunks are issued strictly one after another; output order matches input
/// order because each chunk's vectors are appended in sequence. A failed
/// chunk (after retries) aborts the whole batch; there is no partial
/// success.
pub async fn embed_chunked(
    provider: &dyn EmbeddingProvider,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let limit = provider.batch_limit().max(1);
    debug!(
        provider = provider.provider_name(),
        texts = texts.len(),
        limit,
        "embedding batch"
    );

    let mut all_embeddings = Vec::with_capacity(texts.len());
    let mut offset = 0;
    for chunk in texts.chunks(limit) {
        let label = format!("batch[{}..{}]", offset, offset + chunk.len());
        let embeddings =
            call_with_retry(policy, sleeper, &label, || provider.embed_batch(chunk)).await?;
        all_embeddings.extend(embeddings);
        offset += chunk.len();
    }
    Ok(all_embeddings)
}
