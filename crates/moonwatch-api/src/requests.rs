//! Request types for the API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddHostRequest {
    /// Address of the Moonraker host to track
    pub ip: String,
    /// Optional display name; the reported hostname is used when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenameHostRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StartPollingRequest {
    /// Seconds between poll rounds
    pub interval_seconds: u64,
}
