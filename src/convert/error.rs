//! Conversion error types

use crate::core::{ParseError, SerializationError};
use crate::provider::ProviderError;
use thiserror::Error;

/// Error types for a conversion request. Every variant aborts the request.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error("Provider error: {0}")]
    Provider(#[source] ProviderError),

    #[error(
        "Provider '{provider}' cannot list changed files; refusing to pass a path-gated configuration through unfiltered"
    )]
    UnsupportedProvider { provider: String },

    #[error("Failed to fetch project config '{path}': {source}")]
    ProjectFetch {
        path: String,
        #[source]
        source: ProviderError,
    },

    #[error("Invalid project config '{path}': {source}")]
    Project {
        path: String,
        #[source]
        source: ParseError,
    },
}

impl From<ProviderError> for ConvertError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unsupported { provider } => ConvertError::UnsupportedProvider { provider },
            other => ConvertError::Provider(other),
        }
    }
}
