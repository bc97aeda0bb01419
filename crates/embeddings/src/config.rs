//! Provider selection and credentials, resolved once at generator construction.
//!
//! This crate never reads the environment: the caller resolves whatever
//! sources it wants (env vars, CLI flags, config files) into
//! [`EmbeddingSettings`] and hands them over.

use std::{fmt, str::FromStr, time::Duration};

use secrecy::Secret;

use crate::{embeddings_fallback::DEFAULT_DIMS, error::EmbeddingError};

/// The closed set of supported remote embedding providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Elastic,
    OpenAi,
    Cohere,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Elastic, Provider::OpenAi, Provider::Cohere];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Elastic => "elastic",
            Provider::OpenAi => "openai",
            Provider::Cohere => "cohere",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elastic" => Ok(Provider::Elastic),
            "openai" => Ok(Provider::OpenAi),
            "cohere" => Ok(Provider::Cohere),
            _ => Err(EmbeddingError::UnsupportedProvider {
                name: s.trim().to_string(),
            }),
        }
    }
}

/// Validated, immutable credentials for one provider.
#[derive(Debug)]
pub enum ProviderConfig {
    Elastic {
        base_url: String,
        api_key: Secret<String>,
    },
    OpenAi {
        api_key: Secret<String>,
    },
    Cohere {
        api_key: Secret<String>,
    },
}

impl ProviderConfig {
    #[must_use]
    pub fn provider(&self) -> Provider {
        match self {
            ProviderConfig::Elastic { .. } => Provider::Elastic,
            ProviderConfig::OpenAi { .. } => Provider::OpenAi,
            ProviderConfig::Cohere { .. } => Provider::Cohere,
        }
    }
}

/// Raw, unvalidated settings as resolved by the caller.
///
/// `provider` empty or `None` selects pseudo-vector mode. Credential fields
/// are only consulted for the selected provider.
#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub provider: Option<String>,
    pub elastic_url: Option<String>,
    pub elastic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub cohere_api_key: Option<String>,
    /// Dimension of pseudo-vectors; remote providers fix their own.
    pub pseudo_dims: usize,
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: None,
            elastic_url: None,
            elastic_api_key: None,
            openai_api_key: None,
            cohere_api_key: None,
            pseudo_dims: DEFAULT_DIMS,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl EmbeddingSettings {
    /// Build validated credentials for `provider`, rejecting empty fields.
    pub fn provider_config(&self, provider: Provider) -> Result<ProviderConfig, EmbeddingError> {
        match provider {
            Provider::Elastic => Ok(ProviderConfig::Elastic {
                base_url: require(&self.elastic_url, "elastic", "elastic_url")?,
                api_key: Secret::new(require(&self.elastic_api_key, "elastic", "elastic_api_key")?),
            }),
            Provider::OpenAi => Ok(ProviderConfig::OpenAi {
                api_key: Secret::new(require(&self.openai_api_key, "openai", "openai_api_key")?),
            }),
            Provider::Cohere => Ok(ProviderConfig::Cohere {
                api_key: Secret::new(require(&self.cohere_api_key, "cohere", "cohere_api_key")?),
            }),
        }
    }
}

fn require(
    value: &Option<String>,
    provider: &'static str,
    field: &'static str,
) -> Result<String, EmbeddingError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(EmbeddingError::MissingCredential { provider, field }),
    }
}
