//! Application state shared across HTTP handlers

use std::sync::Arc;

use kameo::actor::ActorRef;
use tokio::sync::broadcast;

use moonwatch_api::events::WsEvent;
use moonwatch_core::MonitorActor;

use crate::config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Reference to the monitor actor
    pub monitor: ActorRef<MonitorActor>,
    /// Broadcast sender the WebSocket route subscribes on
    pub events: broadcast::Sender<WsEvent>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        monitor: ActorRef<MonitorActor>,
        events: broadcast::Sender<WsEvent>,
        config: Config,
    ) -> Self {
        Self {
            monitor,
            events,
            config: Arc::new(config),
        }
    }
}
