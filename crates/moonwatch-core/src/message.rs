//! Message types for the monitor actor
//!
//! Message handlers are implemented in the actor module. User mutations and
//! poll ticks all arrive through the same mailbox, which is what keeps them
//! serialized against each other.

use std::time::Duration;

use kameo_macros::Reply;

use crate::model::{HostRecord, Status};

/// Run one poll round: fan out probes, reconcile, gate notifications
#[derive(Debug)]
pub struct Tick;

/// Result of one poll round
#[derive(Debug, Clone, Copy, Default, Reply)]
pub struct TickSummary {
    /// Hosts probed this round
    pub polled: usize,
    /// Probes that failed
    pub failed: usize,
    /// Hosts whose derived status changed
    pub changed: usize,
    /// Alerts actually dispatched
    pub notified: usize,
}

/// Start (or restart) periodic polling at the given interval
///
/// Idempotent: an already-running poll loop is replaced.
#[derive(Debug)]
pub struct StartPolling {
    pub interval: Duration,
}

/// Stop periodic polling; no-op when idle
#[derive(Debug)]
pub struct StopPolling;

/// Query whether polling is active
#[derive(Debug)]
pub struct PollingStatus;

/// Polling state response
#[derive(Debug, Clone, Copy, Reply)]
pub struct PollingInfo {
    pub polling: bool,
    pub interval: Option<Duration>,
}

/// Read-only snapshot of all tracked hosts
#[derive(Debug)]
pub struct GetHosts;

/// One tracked host together with its current derived status
#[derive(Debug, Clone, Reply)]
pub struct HostView {
    pub record: HostRecord,
    pub status: Status,
}

/// Track a new host
#[derive(Debug)]
pub struct AddHost {
    /// Address to track
    pub ip: String,
    /// Optional display name; counts as a user customization when set
    pub name: Option<String>,
}

/// Stop tracking a host (the only way a record is ever removed)
#[derive(Debug)]
pub struct RemoveHost {
    pub ip: String,
}

/// Set a host's display name
#[derive(Debug)]
pub struct RenameHost {
    pub ip: String,
    pub name: String,
}
