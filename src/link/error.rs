//! Device link error types

use std::fmt;

/// Failures that prevent a request from completing a round-trip
#[derive(Debug, Clone, PartialEq)]
pub enum LinkError {
    /// No response within the request timeout
    Timeout { timeout_ms: u64 },
    /// Device unreachable: refused connection, DNS failure, no route
    ConnectionFailed { details: String },
    /// Any other transport failure, including a truncated body
    Transport { details: String },
    /// Link configured with an unusable value
    ConfigurationError { parameter: String, value: String },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Timeout { timeout_ms } => {
                write!(f, "Request timed out after {}ms", timeout_ms)
            }
            LinkError::ConnectionFailed { details } => {
                write!(f, "Connection failed: {}", details)
            }
            LinkError::Transport { details } => {
                write!(f, "Transport error: {}", details)
            }
            LinkError::ConfigurationError { parameter, value } => {
                write!(f, "Configuration error: invalid {} = {}", parameter, value)
            }
        }
    }
}

impl std::error::Error for LinkError {}

/// Result type for device link operations
pub type LinkResult<T> = Result<T, LinkError>;

impl LinkError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LinkError::Timeout { .. })
    }
}
