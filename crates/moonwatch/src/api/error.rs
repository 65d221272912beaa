//! API error types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kameo::error::SendError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use moonwatch_core::CoreError;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Error message
    pub message: String,
}

/// Wrapper for API errors with status codes
pub struct AppError {
    pub status: StatusCode,
    pub error: ApiError,
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError {
                code: "INTERNAL_ERROR".to_string(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError {
                code: "NOT_FOUND".to_string(),
                message: message.into(),
            },
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            error: ApiError {
                code: "CONFLICT".to_string(),
                message: message.into(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError {
                code: "BAD_REQUEST".to_string(),
                message: message.into(),
            },
        }
    }

    /// Map an actor ask failure onto an HTTP status
    pub fn from_core<M>(err: SendError<M, CoreError>) -> Self {
        match err {
            SendError::HandlerError(core) => match &core {
                CoreError::HostNotFound(_) => Self::not_found(core.to_string()),
                CoreError::HostAlreadyExists(_) => Self::conflict(core.to_string()),
                CoreError::InvalidName(_) | CoreError::InvalidInterval(_) => {
                    Self::bad_request(core.to_string())
                }
            },
            other => Self::internal(format!("monitor unavailable: {other}")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}
