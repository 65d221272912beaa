//! Core error types for moonwatch-core

use thiserror::Error;

/// Errors that can occur in monitor operations
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// Host not found in the tracked set
    #[error("host not found: {0}")]
    HostNotFound(String),

    /// Host already tracked under this address
    #[error("host already exists: {0}")]
    HostAlreadyExists(String),

    /// Rejected display name
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Rejected polling interval
    #[error("invalid poll interval: {0}")]
    InvalidInterval(String),
}
