//! `MonitorActor`: fleet-wide polling and reconciliation
//!
//! Owns the tracked host list, the derived-status cache, and the
//! notification gate. Poll ticks and user mutations are both mailbox
//! messages, so a tick always runs to completion before the next message is
//! handled and no two reconciliation passes can overlap.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use kameo::actor::{ActorRef, WeakActorRef};
use kameo::error::ActorStopReason;
use kameo::message::{Context, Message};
use kameo::prelude::*;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use moonwatch_api::events::WsEvent;
use moonwatch_notify::Notifier;
use moonwatch_probe::{HostProbe, RawSnapshot};

use crate::config::{MonitorPolicy, SeedHost};
use crate::error::CoreError;
use crate::gate::{GateDecision, NotificationGate};
use crate::message::{
    AddHost, GetHosts, HostView, PollingInfo, PollingStatus, RemoveHost, RenameHost, StartPolling,
    StopPolling, Tick, TickSummary,
};
use crate::model::{Connectivity, HostId, HostRecord, Status};
use crate::status::derive_status;

/// Arguments for spawning a `MonitorActor`
pub struct MonitorActorArgs {
    /// Thresholds, windows, and alert toggles
    pub policy: MonitorPolicy,
    /// Single-host poll collaborator
    pub probe: Arc<dyn HostProbe>,
    /// Alert sink collaborator
    pub notifier: Arc<dyn Notifier>,
    /// Event broadcast sender for WebSocket subscribers
    pub event_tx: broadcast::Sender<WsEvent>,
    /// Hosts known before the first poll round
    pub seeds: Vec<SeedHost>,
}

/// Fleet monitor owning the host list and the poll schedule
pub struct MonitorActor {
    policy: MonitorPolicy,
    hosts: Vec<HostRecord>,
    /// Derived status per host as of the last completed pass
    statuses: HashMap<HostId, Status>,
    gate: NotificationGate,
    probe: Arc<dyn HostProbe>,
    notifier: Arc<dyn Notifier>,
    event_tx: broadcast::Sender<WsEvent>,
    /// Current poll interval; `None` while idle
    poll_interval: Option<Duration>,
    /// Control channel into the poll driver task
    poll_tx: watch::Sender<Option<Duration>>,
    driver: tokio::task::JoinHandle<()>,
}

/// Drives the poll cadence from outside the mailbox
///
/// The driver awaits each `Tick` reply before sleeping again, so rounds can
/// never overlap or queue up; a round that outlasts the interval simply
/// skips the missed ticks. A control update interrupts the current wait,
/// which is what makes restart and stop take effect immediately.
async fn poll_driver(
    actor: WeakActorRef<MonitorActor>,
    mut control: watch::Receiver<Option<Duration>>,
) {
    loop {
        let period = loop {
            let current = *control.borrow_and_update();
            if let Some(period) = current {
                break period;
            }
            if control.changed().await.is_err() {
                return;
            }
        };

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let Some(actor) = actor.upgrade() else { return };
                    match actor.ask(Tick).await {
                        Ok(summary) => debug!(
                            polled = summary.polled,
                            failed = summary.failed,
                            changed = summary.changed,
                            notified = summary.notified,
                            "poll round completed"
                        ),
                        Err(e) => warn!(error = %e, "poll tick failed"),
                    }
                }
                changed = control.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }
}

impl MonitorActor {
    /// Number of tracked hosts
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    fn next_order(&self) -> u32 {
        self.hosts.iter().map(|h| h.order).max().map_or(0, |m| m + 1)
    }

    fn find_index(&self, ip: &str) -> Option<usize> {
        self.hosts.iter().position(|h| h.ip_address == ip)
    }

    fn emit(&self, event: WsEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    /// Send one alert; dispatch failures are logged and swallowed so they
    /// can never fail a poll round
    async fn dispatch(&self, title: &str, body: &str, host_ip: Option<&str>) {
        if let Err(e) = self.notifier.notify(title, body, host_ip).await {
            warn!(
                notifier = self.notifier.notifier_type(),
                error = %e,
                title = %title,
                "notification dispatch failed"
            );
        }
    }

    fn transition_alert(record: &HostRecord, from: Status, to: Status) -> (&'static str, String) {
        if to.is_offline() {
            (
                "Printer Offline",
                format!(
                    "{} ({}) is no longer responding",
                    record.display_name, record.ip_address
                ),
            )
        } else {
            (
                "Printer Status Changed",
                format!("{}: {} → {}", record.display_name, from, to),
            )
        }
    }

    /// Reconcile one snapshot batch and gate the resulting transitions
    async fn apply_round(
        &mut self,
        snapshots: Vec<RawSnapshot>,
        polled: usize,
        failed: usize,
    ) -> TickSummary {
        let now = Utc::now();
        let threshold = self.policy.failure_threshold;

        let previous = std::mem::take(&mut self.hosts);
        self.hosts = crate::reconcile::reconcile(previous, snapshots, threshold, now);

        let total = self.hosts.len();
        let derived: Vec<Status> = self
            .hosts
            .iter()
            .map(|h| derive_status(h, threshold))
            .collect();
        let offline = derived.iter().filter(|s| s.is_offline()).count();
        let offline_fraction = if total == 0 {
            0.0
        } else {
            offline as f64 / total as f64
        };

        let mut changed = 0;
        let mut alerts: Vec<(&'static str, String, Option<String>)> = Vec::new();

        for (host, &new_status) in self.hosts.iter().zip(derived.iter()) {
            // A host seen for the first time establishes a baseline silently
            let Some(old_status) = self.statuses.insert(host.id.clone(), new_status) else {
                continue;
            };
            if old_status == new_status {
                continue;
            }
            changed += 1;

            self.emit(WsEvent::StatusChanged {
                ip: host.ip_address.clone(),
                name: host.display_name.clone(),
                from: old_status.as_str().to_string(),
                to: new_status.as_str().to_string(),
            });

            match self.gate.evaluate(&host.id, new_status, offline_fraction, now) {
                GateDecision::Notify => {
                    if self.policy.notifications.enabled_for(new_status) {
                        let (title, body) = Self::transition_alert(host, old_status, new_status);
                        alerts.push((title, body, Some(host.ip_address.clone())));
                    } else {
                        debug!(
                            host = %host.ip_address,
                            status = %new_status,
                            "alerts disabled for this status"
                        );
                    }
                }
                GateDecision::NotifyOutage => {
                    self.emit(WsEvent::OutageDetected { offline, total });
                    alerts.push((
                        "Network Outage",
                        format!("{offline} of {total} printers are offline"),
                        None,
                    ));
                }
                GateDecision::Suppress(reason) => {
                    debug!(
                        host = %host.ip_address,
                        from = %old_status,
                        to = %new_status,
                        reason = %reason,
                        "notification suppressed"
                    );
                }
            }
        }

        let notified = alerts.len();
        for (title, body, host_ip) in alerts {
            self.dispatch(title, &body, host_ip.as_deref()).await;
        }

        self.emit(WsEvent::PollCompleted {
            polled,
            failed,
            changed,
        });

        TickSummary {
            polled,
            failed,
            changed,
            notified,
        }
    }
}

impl Actor for MonitorActor {
    type Args = MonitorActorArgs;
    type Error = CoreError;

    async fn on_start(args: Self::Args, actor_ref: ActorRef<Self>) -> Result<Self, Self::Error> {
        let now = Utc::now();
        let hosts: Vec<HostRecord> = args
            .seeds
            .iter()
            .enumerate()
            .map(|(i, seed)| {
                #[allow(clippy::cast_possible_truncation)]
                let order = i as u32;
                HostRecord {
                    id: HostId::new(seed.ip.clone()),
                    ip_address: seed.ip.clone(),
                    display_name: seed.name.clone().unwrap_or_else(|| seed.ip.clone()),
                    original_name: seed.ip.clone(),
                    order,
                    connectivity: Connectivity::Online,
                    klippy_state: None,
                    moonraker_version: None,
                    flags: None,
                    consecutive_failures: 0,
                    last_seen_at: now,
                }
            })
            .collect();

        let (poll_tx, poll_rx) = watch::channel(None);
        let driver = tokio::spawn(poll_driver(actor_ref.downgrade(), poll_rx));

        info!(
            id = %actor_ref.id(),
            hosts = hosts.len(),
            probe = args.probe.probe_type(),
            notifier = args.notifier.notifier_type(),
            "MonitorActor starting"
        );

        Ok(Self {
            gate: NotificationGate::new(args.policy.gate.clone()),
            policy: args.policy,
            hosts,
            statuses: HashMap::new(),
            probe: args.probe,
            notifier: args.notifier,
            event_tx: args.event_tx,
            poll_interval: None,
            poll_tx,
            driver,
        })
    }

    async fn on_stop(
        &mut self,
        _actor_ref: WeakActorRef<Self>,
        reason: ActorStopReason,
    ) -> Result<(), Self::Error> {
        info!(reason = ?reason, "MonitorActor stopping");
        self.driver.abort();
        Ok(())
    }
}

// ============================================================================
// Message Handlers
// ============================================================================

impl Message<Tick> for MonitorActor {
    type Reply = TickSummary;

    async fn handle(&mut self, _msg: Tick, _ctx: &mut Context<Self, Self::Reply>) -> Self::Reply {
        if self.hosts.is_empty() {
            debug!("no hosts tracked, skipping poll round");
            return TickSummary::default();
        }

        // Fan out one probe per host, then collect the full batch before
        // reconciling: marking "not found" hosts as failed needs all results.
        let mut handles = Vec::with_capacity(self.hosts.len());
        for host in &self.hosts {
            let probe = Arc::clone(&self.probe);
            let ip = host.ip_address.clone();
            handles.push(tokio::spawn(async move {
                let outcome = probe.probe(&ip).await;
                (ip, outcome)
            }));
        }

        let polled = handles.len();
        let mut snapshots = Vec::with_capacity(polled);
        let mut failed = 0;

        for handle in handles {
            match handle.await {
                Ok((_, Ok(snapshot))) => snapshots.push(snapshot),
                Ok((ip, Err(e))) => {
                    failed += 1;
                    if e.is_transient() {
                        debug!(host = %ip, error = %e, "poll failed");
                    } else {
                        warn!(host = %ip, error = %e, "poll failed");
                    }
                }
                Err(e) => {
                    failed += 1;
                    error!(error = %e, "probe task panicked");
                }
            }
        }

        self.apply_round(snapshots, polled, failed).await
    }
}

impl Message<StartPolling> for MonitorActor {
    type Reply = Result<(), CoreError>;

    async fn handle(
        &mut self,
        msg: StartPolling,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        if msg.interval.is_zero() {
            return Err(CoreError::InvalidInterval(
                "interval must be at least one millisecond".to_string(),
            ));
        }

        let restarted = self.poll_interval.replace(msg.interval).is_some();
        let _ = self.poll_tx.send(Some(msg.interval));

        info!(interval = ?msg.interval, restarted, "polling started");
        Ok(())
    }
}

impl Message<StopPolling> for MonitorActor {
    type Reply = ();

    async fn handle(
        &mut self,
        _msg: StopPolling,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        if self.poll_interval.take().is_some() {
            let _ = self.poll_tx.send(None);
            info!("polling stopped");
        } else {
            debug!("polling already stopped");
        }
    }
}

impl Message<PollingStatus> for MonitorActor {
    type Reply = PollingInfo;

    async fn handle(
        &mut self,
        _msg: PollingStatus,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        PollingInfo {
            polling: self.poll_interval.is_some(),
            interval: self.poll_interval,
        }
    }
}

impl Message<GetHosts> for MonitorActor {
    type Reply = Vec<HostView>;

    async fn handle(
        &mut self,
        _msg: GetHosts,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        let threshold = self.policy.failure_threshold;
        let mut views: Vec<HostView> = self
            .hosts
            .iter()
            .map(|h| HostView {
                record: h.clone(),
                status: derive_status(h, threshold),
            })
            .collect();
        views.sort_by_key(|v| v.record.order);
        views
    }
}

impl Message<AddHost> for MonitorActor {
    type Reply = Result<HostView, CoreError>;

    async fn handle(
        &mut self,
        msg: AddHost,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        if self.find_index(&msg.ip).is_some() {
            return Err(CoreError::HostAlreadyExists(msg.ip));
        }

        let now = Utc::now();
        let order = self.next_order();

        // One immediate probe so the record starts with real data; an
        // unreachable host is still tracked, just offline from the start.
        let record = match self.probe.probe(&msg.ip).await {
            Ok(snapshot) => {
                let mut record = HostRecord::from_snapshot(&snapshot, order, now);
                if let Some(name) = msg.name {
                    record.display_name = name;
                }
                record
            }
            Err(e) => {
                debug!(host = %msg.ip, error = %e, "added host did not answer initial probe");
                let name = msg.name.unwrap_or_else(|| msg.ip.clone());
                HostRecord {
                    id: HostId::new(msg.ip.clone()),
                    ip_address: msg.ip.clone(),
                    display_name: name,
                    original_name: msg.ip.clone(),
                    order,
                    connectivity: Connectivity::Offline,
                    klippy_state: None,
                    moonraker_version: None,
                    flags: None,
                    consecutive_failures: 1,
                    last_seen_at: now,
                }
            }
        };

        let status = derive_status(&record, self.policy.failure_threshold);
        self.statuses.insert(record.id.clone(), status);
        self.emit(WsEvent::HostDiscovered {
            ip: record.ip_address.clone(),
            name: record.display_name.clone(),
        });
        self.dispatch(
            "New Printer Discovered",
            &format!("{} ({})", record.display_name, record.ip_address),
            Some(&record.ip_address),
        )
        .await;

        info!(host = %record.ip_address, name = %record.display_name, "host added");
        self.hosts.push(record.clone());

        Ok(HostView { record, status })
    }
}

impl Message<RemoveHost> for MonitorActor {
    type Reply = Result<(), CoreError>;

    async fn handle(
        &mut self,
        msg: RemoveHost,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        let Some(index) = self.find_index(&msg.ip) else {
            return Err(CoreError::HostNotFound(msg.ip));
        };

        let record = self.hosts.remove(index);
        self.gate.forget(&record.id);
        self.statuses.remove(&record.id);
        self.emit(WsEvent::HostRemoved {
            ip: record.ip_address.clone(),
        });

        info!(host = %record.ip_address, "host removed");
        Ok(())
    }
}

impl Message<RenameHost> for MonitorActor {
    type Reply = Result<HostView, CoreError>;

    async fn handle(
        &mut self,
        msg: RenameHost,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        let name = msg.name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidName(
                "display name cannot be empty".to_string(),
            ));
        }

        let threshold = self.policy.failure_threshold;
        let Some(index) = self.find_index(&msg.ip) else {
            return Err(CoreError::HostNotFound(msg.ip));
        };

        let host = &mut self.hosts[index];
        host.display_name = name.to_string();

        info!(host = %host.ip_address, name = %host.display_name, "host renamed");
        Ok(HostView {
            record: host.clone(),
            status: derive_status(host, threshold),
        })
    }
}
