//! moonwatch-core: Host reconciliation and notification engine
//!
//! Implements the `MonitorActor` using the kameo framework. Contains the host
//! data model, the status derivation rules, the reconciliation pass that
//! merges poll results into the tracked host list, and the notification gate
//! that decides which status transitions are worth alerting on.

pub mod actor;
pub mod config;
pub mod error;
pub mod gate;
pub mod message;
pub mod model;
pub mod reconcile;
pub mod status;

pub use actor::monitor::{MonitorActor, MonitorActorArgs};
pub use config::{MonitorPolicy, NotificationToggles, SeedHost};
pub use error::CoreError;
pub use gate::{GateDecision, GatePolicy, NotificationGate, SuppressReason};
pub use message::{
    AddHost, GetHosts, HostView, PollingInfo, PollingStatus, RemoveHost, RenameHost, StartPolling,
    StopPolling, Tick, TickSummary,
};
pub use model::{Connectivity, HostId, HostRecord, Status};
pub use reconcile::reconcile;
pub use status::derive_status;
