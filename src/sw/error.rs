//! Service worker error types

use thiserror::Error;

/// Errors raised while handling worker events
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwError {
    /// Cache Storage operation failed
    #[error("Cache error: {0}")]
    Cache(String),

    /// The network request itself failed
    #[error("Network error: {0}")]
    Network(String),

    /// An install-time asset could not be fetched
    #[error("Pre-cache failed for {url}: {reason}")]
    Precache { url: String, reason: String },

    /// Invalid push payload
    #[error("Payload error: {0}")]
    Payload(String),

    /// Worker global scope call failed (clients, registration)
    #[error("Scope error: {0}")]
    Scope(String),

    /// Malformed request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for SwError {
    fn from(err: serde_json::Error) -> Self {
        SwError::Payload(err.to_string())
    }
}

impl From<url::ParseError> for SwError {
    fn from(err: url::ParseError) -> Self {
        SwError::InvalidUrl(err.to_string())
    }
}

/// Result type alias for worker operations
pub type SwResult<T> = Result<T, SwError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precache_error_display() {
        let err = SwError::Precache {
            url: "https://cloudstore.uz/offline/".to_string(),
            reason: "HTTP 404".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Pre-cache failed for https://cloudstore.uz/offline/: HTTP 404"
        );
    }

    #[test]
    fn test_from_json_error() {
        let err: SwError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, SwError::Payload(_)));
    }
}
