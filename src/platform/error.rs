//! Platform error types
//!
//! Failures reported by a browser binding.

use thiserror::Error;

/// Errors raised by the browser capabilities
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// A browser API threw
    #[error("JavaScript error: {0}")]
    Js(String),

    /// The capability is not available in this browser or context
    #[error("Unsupported: {0}")]
    Unsupported(&'static str),

    /// The user agent dismissed or never resolved a request
    #[error("Aborted: {0}")]
    Aborted(String),
}

/// Result type alias for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;
