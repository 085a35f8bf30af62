//! Transport-level errors shared by every Altered API caller

use thiserror::Error;

/// Errors raised while talking to the Altered API
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// HTTP error status code. Never retried.
    #[error("HTTP error {status} for {url}{}", token_hint(.authenticated))]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
        authenticated: bool,
    },
    /// Every connection attempt for one request failed
    #[error("Request to {url} failed after {attempts} attempts: {source}")]
    ExhaustedRetries {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
}

fn token_hint(authenticated: &bool) -> &'static str {
    if *authenticated {
        " (is your token up to date?)"
    } else {
        ""
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
