//! Response types for the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// One tracked host as exposed over HTTP
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HostResponse {
    pub id: String,
    pub ip: String,
    pub name: String,
    pub original_name: String,
    pub order: u32,
    /// Derived status label (offline, error, cancelling, paused, printing, standby)
    pub status: String,
    pub klippy_state: Option<String>,
    pub moonraker_version: Option<String>,
    pub consecutive_failures: u32,
    /// Timestamp of the last poll attempt, success or failure
    pub last_seen_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HostListResponse {
    pub hosts: Vec<HostResponse>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PollingStatusResponse {
    pub polling: bool,
    /// Configured interval in seconds, when polling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<u64>,
}
