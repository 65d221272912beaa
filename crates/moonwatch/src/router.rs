//! HTTP router configuration

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{delete, get, patch, post},
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use moonwatch_api::events::WsEvent;
use moonwatch_api::requests::{AddHostRequest, RenameHostRequest, StartPollingRequest};
use moonwatch_api::responses::{
    HealthResponse, HostListResponse, HostResponse, PollingStatusResponse,
};

use crate::api::error::ApiError;
use crate::api::{hosts, system};
use crate::state::AppState;
use crate::ws;

#[derive(OpenApi)]
#[openapi(
    paths(
        system::health,
        system::polling_status,
        system::start_polling,
        system::stop_polling,
        hosts::list_hosts,
        hosts::add_host,
        hosts::remove_host,
        hosts::rename_host,
    ),
    components(schemas(
        HealthResponse,
        HostResponse,
        HostListResponse,
        PollingStatusResponse,
        AddHostRequest,
        RenameHostRequest,
        StartPollingRequest,
        WsEvent,
        ApiError,
    ))
)]
struct ApiDoc;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let openapi = ApiDoc::openapi();

    Router::new()
        // System endpoints
        .route("/health", get(system::health))
        .route("/api/polling", get(system::polling_status))
        .route("/api/polling/start", post(system::start_polling))
        .route("/api/polling/stop", post(system::stop_polling))
        // Host endpoints
        .route("/api/hosts", get(hosts::list_hosts).post(hosts::add_host))
        .route("/api/hosts/{ip}", delete(hosts::remove_host))
        .route("/api/hosts/{ip}/name", patch(hosts::rename_host))
        // Event stream
        .route("/ws", get(ws::ws_handler))
        // API documentation
        .merge(Scalar::with_url("/docs", openapi.clone()))
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let doc = openapi.clone();
                async move { Json(doc) }
            }),
        )
        // State
        .with_state(state)
}
