//! Host data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use moonwatch_probe::{KlippyState, PrinterFlags, RawSnapshot};

/// Stable opaque host identifier
///
/// Assigned once when a host is first discovered and never reassigned, even
/// if the device later reports under a different name. Derived from the
/// first-seen address, which is what the record is keyed by in practice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(String);

impl HostId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether the last poll round could reach the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

/// Canonical derived status of a tracked printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Offline,
    Error,
    Cancelling,
    Paused,
    Printing,
    Standby,
}

impl Status {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Offline => "offline",
            Status::Error => "error",
            Status::Cancelling => "cancelling",
            Status::Paused => "paused",
            Status::Printing => "printing",
            Status::Standby => "standby",
        }
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        matches!(self, Status::Offline)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked printer controller
///
/// Created when a poll first reports an unknown address, mutated on every
/// reconciliation pass, removed only by explicit user action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostRecord {
    /// Stable identifier, never reassigned
    pub id: HostId,
    /// Network address; the join key when merging poll results
    pub ip_address: String,
    /// User-editable name shown in UIs
    pub display_name: String,
    /// Last name the device itself reported
    pub original_name: String,
    /// Manual ordering position, stable across rescans
    pub order: u32,
    /// Reachability from the last completed poll rounds
    pub connectivity: Connectivity,
    /// Last reported Klippy firmware state
    pub klippy_state: Option<KlippyState>,
    /// Last reported Moonraker version
    pub moonraker_version: Option<String>,
    /// Last known status flags, absent until a flags endpoint answered
    pub flags: Option<PrinterFlags>,
    /// Consecutive failed poll attempts; reset on any successful poll
    pub consecutive_failures: u32,
    /// Timestamp of the last poll attempt, success or failure
    pub last_seen_at: DateTime<Utc>,
}

impl HostRecord {
    /// Build a fresh record from a first-time snapshot
    #[must_use]
    pub fn from_snapshot(snapshot: &RawSnapshot, order: u32, now: DateTime<Utc>) -> Self {
        Self {
            id: HostId::new(snapshot.ip_address.clone()),
            ip_address: snapshot.ip_address.clone(),
            display_name: snapshot.name.clone(),
            original_name: snapshot.name.clone(),
            order,
            connectivity: Connectivity::Online,
            klippy_state: Some(snapshot.klippy_state),
            moonraker_version: snapshot.moonraker_version.clone(),
            flags: snapshot.flags.clone(),
            consecutive_failures: 0,
            last_seen_at: now,
        }
    }

    /// Whether the user renamed this host
    ///
    /// A record whose display name still matches the device-reported name has
    /// not been customized and may be overwritten by a newly reported name.
    #[must_use]
    pub fn is_customized(&self) -> bool {
        self.display_name != self.original_name
    }
}
