//! Host management API endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use moonwatch_api::requests::{AddHostRequest, RenameHostRequest};
use moonwatch_api::responses::{HostListResponse, HostResponse};
use moonwatch_core::{AddHost, GetHosts, HostView, RemoveHost, RenameHost};

use crate::api::error::AppError;
use crate::state::AppState;

fn to_response(view: &HostView) -> HostResponse {
    HostResponse {
        id: view.record.id.as_str().to_string(),
        ip: view.record.ip_address.clone(),
        name: view.record.display_name.clone(),
        original_name: view.record.original_name.clone(),
        order: view.record.order,
        status: view.status.as_str().to_string(),
        klippy_state: view.record.klippy_state.map(|s| s.as_str().to_string()),
        moonraker_version: view.record.moonraker_version.clone(),
        consecutive_failures: view.record.consecutive_failures,
        last_seen_at: view.record.last_seen_at,
    }
}

/// List all tracked hosts
///
/// # Errors
/// Returns `AppError` if monitor communication fails
#[utoipa::path(
    get,
    path = "/api/hosts",
    responses((status = 200, description = "All tracked hosts", body = HostListResponse))
)]
pub async fn list_hosts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let views = state
        .monitor
        .ask(GetHosts)
        .await
        .map_err(|e| AppError::internal(format!("failed to list hosts: {e}")))?;

    let hosts: Vec<HostResponse> = views.iter().map(to_response).collect();
    let total = hosts.len();

    Ok(Json(HostListResponse { hosts, total }))
}

/// Track a new host
///
/// # Errors
/// Returns `AppError` if the address is already tracked
#[utoipa::path(
    post,
    path = "/api/hosts",
    request_body = AddHostRequest,
    responses(
        (status = 201, description = "Host is now tracked", body = HostResponse),
        (status = 409, description = "Address already tracked")
    )
)]
pub async fn add_host(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddHostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = state
        .monitor
        .ask(AddHost {
            ip: req.ip,
            name: req.name,
        })
        .await
        .map_err(AppError::from_core)?;

    Ok((StatusCode::CREATED, Json(to_response(&view))))
}

/// Stop tracking a host
///
/// # Errors
/// Returns `AppError` if the host is not tracked
#[utoipa::path(
    delete,
    path = "/api/hosts/{ip}",
    params(("ip" = String, Path, description = "Tracked host address")),
    responses(
        (status = 204, description = "Host removed"),
        (status = 404, description = "Host not tracked")
    )
)]
pub async fn remove_host(
    State(state): State<Arc<AppState>>,
    Path(ip): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state
        .monitor
        .ask(RemoveHost { ip })
        .await
        .map_err(AppError::from_core)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Set a host's display name
///
/// # Errors
/// Returns `AppError` if the host is not tracked or the name is empty
#[utoipa::path(
    patch,
    path = "/api/hosts/{ip}/name",
    params(("ip" = String, Path, description = "Tracked host address")),
    request_body = RenameHostRequest,
    responses(
        (status = 200, description = "Host renamed", body = HostResponse),
        (status = 400, description = "Empty name"),
        (status = 404, description = "Host not tracked")
    )
)]
pub async fn rename_host(
    State(state): State<Arc<AppState>>,
    Path(ip): Path<String>,
    Json(req): Json<RenameHostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = state
        .monitor
        .ask(RenameHost { ip, name: req.name })
        .await
        .map_err(AppError::from_core)?;

    Ok(Json(to_response(&view)))
}
