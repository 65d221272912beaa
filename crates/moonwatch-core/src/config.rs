//! Monitor policy and seed types

use serde::{Deserialize, Serialize};

use crate::gate::GatePolicy;
use crate::model::Status;

/// Which derived statuses are allowed to alert
///
/// Offline alerts are always on; the toggles cover the remaining statuses.
/// A disabled status still flows through the gate so flapping detection sees
/// every transition; only the final dispatch is skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationToggles {
    #[serde(default = "default_on")]
    pub printing: bool,
    #[serde(default = "default_on")]
    pub paused: bool,
    #[serde(default = "default_on")]
    pub error: bool,
    #[serde(default = "default_on")]
    pub cancelling: bool,
    #[serde(default)]
    pub standby: bool,
}

fn default_on() -> bool {
    true
}

impl Default for NotificationToggles {
    fn default() -> Self {
        Self {
            printing: true,
            paused: true,
            error: true,
            cancelling: true,
            standby: false,
        }
    }
}

impl NotificationToggles {
    #[must_use]
    pub fn enabled_for(&self, status: Status) -> bool {
        match status {
            Status::Offline => true,
            Status::Error => self.error,
            Status::Cancelling => self.cancelling,
            Status::Paused => self.paused,
            Status::Printing => self.printing,
            Status::Standby => self.standby,
        }
    }
}

/// Tunable policy for the monitor
///
/// The observed deployments disagreed on these values (failure thresholds of
/// 3, 5 and 8 were all in the wild); this is the one canonical set.
#[derive(Debug, Clone)]
pub struct MonitorPolicy {
    /// Consecutive failed polls before a host is considered offline
    pub failure_threshold: u32,
    /// Notification gate thresholds and windows
    pub gate: GatePolicy,
    /// Per-status alert toggles
    pub notifications: NotificationToggles,
}

impl Default for MonitorPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            gate: GatePolicy::default(),
            notifications: NotificationToggles::default(),
        }
    }
}

/// A host known before the first poll round, e.g. from the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedHost {
    /// Address of the Moonraker host
    pub ip: String,
    /// Optional display name; counts as a user customization when set
    pub name: Option<String>,
}
