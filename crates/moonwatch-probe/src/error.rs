//! Error types for moonwatch-probe

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while probing a host
#[derive(Error, Debug, Clone)]
pub enum ProbeError {
    /// Failed to reach the host at all
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Probe timed out
    #[error("probe timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// Host answered with a non-success HTTP status
    #[error("API error: HTTP {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    Parse(String),

    /// Other transport-level error
    #[error("network error: {0}")]
    Network(String),
}

impl ProbeError {
    /// Check whether the failure is an ordinary liveness miss
    ///
    /// Transient failures feed the consecutive-failure counter and are logged
    /// at debug; anything else is worth a warning.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProbeError::ConnectionFailed(_) | ProbeError::Timeout { .. } | ProbeError::Network(_)
        )
    }
}
