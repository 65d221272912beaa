//! Error types for moonwatch-notify

use thiserror::Error;

/// Errors that can occur while dispatching a notification
#[derive(Error, Debug, Clone)]
pub enum NotifyError {
    /// Platform notification service rejected the request
    #[error("notification dispatch failed: {0}")]
    DispatchFailed(String),

    /// Background dispatch task could not complete
    #[error("dispatch task failed: {0}")]
    TaskFailed(String),
}
