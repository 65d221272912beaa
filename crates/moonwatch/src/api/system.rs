//! Health and polling control endpoints

use std::sync::Arc;
use std::time::Duration;

use axum::{Json, extract::State, response::IntoResponse};

use moonwatch_api::requests::StartPollingRequest;
use moonwatch_api::responses::{HealthResponse, PollingStatusResponse};
use moonwatch_core::{PollingStatus, StartPolling, StopPolling};

use crate::api::error::AppError;
use crate::state::AppState;

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Daemon is up", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Current polling state
///
/// # Errors
/// Returns `AppError` if monitor communication fails
#[utoipa::path(
    get,
    path = "/api/polling",
    responses((status = 200, description = "Polling state", body = PollingStatusResponse))
)]
pub async fn polling_status(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let info = state
        .monitor
        .ask(PollingStatus)
        .await
        .map_err(|e| AppError::internal(format!("failed to query polling state: {e}")))?;

    Ok(Json(PollingStatusResponse {
        polling: info.polling,
        interval_seconds: info.interval.map(|d| d.as_secs()),
    }))
}

/// Start or restart periodic polling
///
/// # Errors
/// Returns `AppError` if the interval is zero
#[utoipa::path(
    post,
    path = "/api/polling/start",
    request_body = StartPollingRequest,
    responses(
        (status = 200, description = "Polling is running", body = PollingStatusResponse),
        (status = 400, description = "Invalid interval")
    )
)]
pub async fn start_polling(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartPollingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let interval = Duration::from_secs(req.interval_seconds);
    state
        .monitor
        .ask(StartPolling { interval })
        .await
        .map_err(AppError::from_core)?;

    Ok(Json(PollingStatusResponse {
        polling: true,
        interval_seconds: Some(req.interval_seconds),
    }))
}

/// Stop periodic polling; no-op when idle
///
/// # Errors
/// Returns `AppError` if monitor communication fails
#[utoipa::path(
    post,
    path = "/api/polling/stop",
    responses((status = 200, description = "Polling is stopped", body = PollingStatusResponse))
)]
pub async fn stop_polling(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    state
        .monitor
        .ask(StopPolling)
        .await
        .map_err(|e| AppError::internal(format!("failed to stop polling: {e}")))?;

    Ok(Json(PollingStatusResponse {
        polling: false,
        interval_seconds: None,
    }))
}
