//! Flight provider error types.

use std::path::PathBuf;

use crate::results::PipelineError;

/// Errors that can occur when fetching flights from a provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token request rejected or token no longer accepted
    #[error("unauthorized: check FLIGHTS_API_CLIENT_ID and FLIGHTS_API_CLIENT_SECRET")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Static flight data could not be read
    #[error("failed to read flight data {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Provider not configured
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl From<ProviderError> for PipelineError {
    fn from(err: ProviderError) -> Self {
        PipelineError::Fetch(err.to_string())
    }
}
