//! API Error Types
//!
//! Failures talking to the Cloudstore JSON endpoints.

use thiserror::Error;

/// Errors from the JSON endpoints
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Request never produced a response (offline, DNS, CORS, aborted)
    #[error("Network error: {0}")]
    Network(String),

    /// Response body was not the expected JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request could not be built
    #[error("Request build error: {0}")]
    Request(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
