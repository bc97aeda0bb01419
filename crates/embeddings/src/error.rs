//! Error taxonomy for embedding generation.

use reqwest::StatusCode;

/// Errors produced while configuring a generator or calling a provider.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// The provider name is not one of the recognized set.
    #[error("unknown embedding provider {name:?}, supported: elastic, openai, cohere")]
    UnsupportedProvider { name: String },

    /// A provider was selected but a required credential field is empty.
    #[error("{provider} provider requires {field}")]
    MissingCredential {
        provider: &'static str,
        field: &'static str,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("{provider} embedding request failed with status {status}: {body}")]
    Http {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The provider answered 2xx but the body is missing expected fields.
    #[error("malformed {provider} embedding response: {reason}")]
    MalformedResponse {
        provider: &'static str,
        reason: String,
    },

    /// A single-text call came back with an empty vector list.
    #[error("{provider} returned no embedding")]
    EmptyResponse { provider: &'static str },

    /// Transport-level failure with no HTTP status attached.
    #[error("embedding request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl EmbeddingError {
    /// Transient failures worth retrying: rate limiting and server-side errors.
    /// Everything else (auth, bad request, malformed bodies, transport faults)
    /// escalates immediately.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }

    pub(crate) fn malformed(provider: &'static str, err: &serde_json::Error) -> Self {
        Self::MalformedResponse {
            provider,
            reason: err.to_string(),
        }
    }
}
