//! Notification gating
//!
//! Decides whether a detected status transition should produce an outbound
//! alert. Three independent noise sources get their own guard, evaluated in
//! a fixed order: instability timeout before duplicate counting (a flapping
//! host should stop alerting entirely, not just be rate limited), and outage
//! collapse before per-host duplicate logic (otherwise the first host alerts
//! individually before the outage is recognized).

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::model::{HostId, Status};

/// Thresholds and windows for the notification gate
#[derive(Debug, Clone)]
pub struct GatePolicy {
    /// Window for counting online/offline flips
    pub oscillation_window: Duration,
    /// Flips inside the window that mark a host as flapping
    pub oscillation_threshold: usize,
    /// How long a flapping host stays muted
    pub instability_timeout: Duration,
    /// Fraction of tracked hosts offline that counts as a network-wide outage
    pub outage_fraction: f64,
    /// Minimum gap between outage alerts
    pub outage_window: Duration,
    /// Window for duplicate suppression per host and status
    pub duplicate_window: Duration,
    /// Alerts allowed per host and status inside the duplicate window
    pub duplicate_cap: u32,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            oscillation_window: Duration::from_secs(60),
            oscillation_threshold: 4,
            instability_timeout: Duration::from_secs(300),
            outage_fraction: 0.70,
            outage_window: Duration::from_secs(300),
            duplicate_window: Duration::from_secs(60),
            duplicate_cap: 3,
        }
    }
}

/// Why a transition was not allowed to alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Host is muted after earlier flapping
    InTimeout,
    /// This transition tripped the flapping detector
    OscillationDetected,
    /// A network-wide outage was already alerted inside the window
    OutageCollapsed,
    /// Same alert already sent the allowed number of times in the window
    DuplicateCap,
}

impl std::fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SuppressReason::InTimeout => "in instability timeout",
            SuppressReason::OscillationDetected => "oscillation detected",
            SuppressReason::OutageCollapsed => "outage already reported",
            SuppressReason::DuplicateCap => "duplicate cap reached",
        };
        f.write_str(s)
    }
}

/// Outcome of gating one status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Send a per-host alert
    Notify,
    /// Send one network-wide outage alert instead of a per-host one
    NotifyOutage,
    /// Stay silent
    Suppress(SuppressReason),
}

/// Duplicate-suppression and flapping bookkeeping for one host
///
/// Not persisted; rebuilt from scratch on process start.
#[derive(Debug, Default)]
struct NotificationState {
    last_notified_at: Option<DateTime<Utc>>,
    last_notified_status: Option<Status>,
    notified_in_window: u32,
    timeout_until: Option<DateTime<Utc>>,
    status_history: VecDeque<(Status, DateTime<Utc>)>,
}

/// Per-host and global notification policy state
///
/// Owns the per-host `NotificationState` store keyed by host id, so multiple
/// independent gates can coexist and tests stay deterministic.
#[derive(Debug)]
pub struct NotificationGate {
    policy: GatePolicy,
    states: HashMap<HostId, NotificationState>,
    last_outage_at: Option<DateTime<Utc>>,
    outage_streak: u32,
}

fn elapsed_within(now: DateTime<Utc>, since: DateTime<Utc>, window: Duration) -> bool {
    match (now - since).to_std() {
        Ok(elapsed) => elapsed < window,
        // `since` in the future only happens with a clock step; stay inside
        // the window rather than re-alerting
        Err(_) => true,
    }
}

fn deadline(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(window).map_or(DateTime::<Utc>::MAX_UTC, |delta| now + delta)
}

impl NotificationGate {
    #[must_use]
    pub fn new(policy: GatePolicy) -> Self {
        Self {
            policy,
            states: HashMap::new(),
            last_outage_at: None,
            outage_streak: 0,
        }
    }

    /// Gate one status transition
    ///
    /// The caller guarantees the status actually changed since the previous
    /// reconciliation pass. `offline_fraction` is the share of all tracked
    /// hosts whose derived status is offline after this pass. Mutates the
    /// host's notification state and the global outage state.
    pub fn evaluate(
        &mut self,
        host_id: &HostId,
        new_status: Status,
        offline_fraction: f64,
        now: DateTime<Utc>,
    ) -> GateDecision {
        let state = self.states.entry(host_id.clone()).or_default();

        // 1. Instability timeout
        if let Some(until) = state.timeout_until {
            if now < until {
                return GateDecision::Suppress(SuppressReason::InTimeout);
            }
            state.timeout_until = None;
        }

        // 2. Oscillation detection
        state.status_history.push_back((new_status, now));
        while let Some((_, ts)) = state.status_history.front() {
            if elapsed_within(now, *ts, self.policy.oscillation_window) {
                break;
            }
            state.status_history.pop_front();
        }
        let flips = state
            .status_history
            .iter()
            .zip(state.status_history.iter().skip(1))
            .filter(|((a, _), (b, _))| a.is_offline() != b.is_offline())
            .count();
        if flips >= self.policy.oscillation_threshold {
            state.timeout_until = Some(deadline(now, self.policy.instability_timeout));
            warn!(
                host = %host_id,
                flips,
                window = ?self.policy.oscillation_window,
                "host is flapping, muting alerts"
            );
            return GateDecision::Suppress(SuppressReason::OscillationDetected);
        }

        // 3. Outage collapse
        if new_status.is_offline() && offline_fraction >= self.policy.outage_fraction {
            if let Some(last) = self.last_outage_at {
                if elapsed_within(now, last, self.policy.outage_window) {
                    self.outage_streak += 1;
                    debug!(
                        host = %host_id,
                        streak = self.outage_streak,
                        "offline alert collapsed into ongoing outage"
                    );
                    return GateDecision::Suppress(SuppressReason::OutageCollapsed);
                }
            }
            self.last_outage_at = Some(now);
            self.outage_streak = 1;
            return GateDecision::NotifyOutage;
        }

        // 4. Duplicate suppression per host and status
        let same_alert = state.last_notified_status == Some(new_status)
            && state
                .last_notified_at
                .is_some_and(|at| elapsed_within(now, at, self.policy.duplicate_window));
        if same_alert {
            if state.notified_in_window >= self.policy.duplicate_cap {
                return GateDecision::Suppress(SuppressReason::DuplicateCap);
            }
            state.notified_in_window += 1;
        } else {
            state.notified_in_window = 1;
        }

        // 5. Allowed
        state.last_notified_at = Some(now);
        state.last_notified_status = Some(new_status);
        GateDecision::Notify
    }

    /// Drop all state for an explicitly removed host
    pub fn forget(&mut self, host_id: &HostId) {
        self.states.remove(host_id);
    }

    /// Collapsed offline alerts during the current outage window
    #[must_use]
    pub fn outage_streak(&self) -> u32 {
        self.outage_streak
    }
}
