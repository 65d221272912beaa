//! WebSocket event types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type")]
pub enum WsEvent {
    StatusChanged {
        ip: String,
        name: String,
        from: String,
        to: String,
    },
    HostDiscovered {
        ip: String,
        name: String,
    },
    HostRemoved {
        ip: String,
    },
    OutageDetected {
        offline: usize,
        total: usize,
    },
    PollCompleted {
        polled: usize,
        failed: usize,
        changed: usize,
    },
}
