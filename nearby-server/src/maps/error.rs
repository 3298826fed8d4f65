//! Maps client error types.

use crate::pipeline::ProviderError;

/// Errors from the maps HTTP client and the fixture provider.
#[derive(Debug, thiserror::Error)]
pub enum MapsError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The web service answered 200 with a non-OK `status` field
    #[error("maps status {status}: {message}")]
    Status { status: String, message: String },

    /// HTTP error status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by maps API")]
    RateLimited,

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Fixture file missing or unreadable
    #[error("fixture error: {0}")]
    Fixture(String),
}

impl From<MapsError> for ProviderError {
    fn from(err: MapsError) -> Self {
        match err {
            MapsError::Status { status, message } => ProviderError::Status { status, message },
            MapsError::Json { message, .. } => ProviderError::Malformed(message),
            other => ProviderError::Unavailable(other.to_string()),
        }
    }
}
