//! Integration tests for the monitor actor using mock collaborators

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kameo::actor::Spawn;
use kameo::error::SendError;
use tokio::sync::{Mutex, broadcast};

use moonwatch_core::{
    AddHost, CoreError, GatePolicy, GetHosts, MonitorActor, MonitorActorArgs, MonitorPolicy,
    PollingStatus, RemoveHost, RenameHost, SeedHost, StartPolling, Status, StopPolling, Tick,
};
use moonwatch_notify::{Notifier, NotifyError};
use moonwatch_probe::{HostProbe, KlippyState, ProbeError, RawSnapshot};

/// Mock probe returning canned per-address results
struct MockProbe {
    responses: Mutex<HashMap<String, Result<RawSnapshot, ProbeError>>>,
    calls: AtomicUsize,
}

impl MockProbe {
    fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    async fn set_online(&self, ip: &str, name: &str) {
        let snapshot = RawSnapshot {
            ip_address: ip.to_string(),
            name: name.to_string(),
            klippy_state: KlippyState::Ready,
            moonraker_version: Some("v0.9.3".to_string()),
            flags: None,
        };
        self.responses
            .lock()
            .await
            .insert(ip.to_string(), Ok(snapshot));
    }

    async fn set_failing(&self, ip: &str) {
        self.responses.lock().await.insert(
            ip.to_string(),
            Err(ProbeError::ConnectionFailed("connection refused".to_string())),
        );
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostProbe for MockProbe {
    async fn probe(&self, ip: &str) -> Result<RawSnapshot, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.lock().await.get(ip) {
            Some(outcome) => outcome.clone(),
            None => Err(ProbeError::ConnectionFailed("no route".to_string())),
        }
    }

    fn probe_type(&self) -> &'static str {
        "mock"
    }
}

/// Notifier recording every dispatched alert
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, Option<String>)>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    async fn titles(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|(title, _, _)| title.clone())
            .collect()
    }

    async fn count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        title: &str,
        body: &str,
        host_ip: Option<&str>,
    ) -> Result<(), NotifyError> {
        self.sent.lock().await.push((
            title.to_string(),
            body.to_string(),
            host_ip.map(String::from),
        ));
        Ok(())
    }

    fn notifier_type(&self) -> &'static str {
        "recording"
    }
}

fn seed(ip: &str) -> SeedHost {
    SeedHost {
        ip: ip.to_string(),
        name: None,
    }
}

fn spawn_monitor(
    policy: MonitorPolicy,
    seeds: Vec<SeedHost>,
    probe: Arc<MockProbe>,
    notifier: Arc<RecordingNotifier>,
) -> kameo::actor::ActorRef<MonitorActor> {
    let (event_tx, _) = broadcast::channel(64);
    MonitorActor::spawn(MonitorActorArgs {
        policy,
        probe,
        notifier,
        event_tx,
        seeds,
    })
}

#[tokio::test]
async fn status_change_dispatches_one_alert() {
    let probe = Arc::new(MockProbe::new());
    let notifier = Arc::new(RecordingNotifier::new());
    probe.set_online("10.0.0.1", "voron").await;

    let monitor = spawn_monitor(
        MonitorPolicy::default(),
        vec![seed("10.0.0.1")],
        Arc::clone(&probe),
        Arc::clone(&notifier),
    );

    // first round establishes the baseline silently
    let summary = monitor.ask(Tick).await.unwrap();
    assert_eq!(summary.polled, 1);
    assert_eq!(summary.notified, 0);

    // same status again: no transition, no alert
    let summary = monitor.ask(Tick).await.unwrap();
    assert_eq!(summary.changed, 0);

    let printing = RawSnapshot {
        ip_address: "10.0.0.1".to_string(),
        name: "voron".to_string(),
        klippy_state: KlippyState::Ready,
        moonraker_version: Some("v0.9.3".to_string()),
        flags: Some(moonwatch_probe::PrinterFlags {
            printing: true,
            ..Default::default()
        }),
    };
    probe
        .responses
        .lock()
        .await
        .insert("10.0.0.1".to_string(), Ok(printing));

    let summary = monitor.ask(Tick).await.unwrap();
    assert_eq!(summary.changed, 1);
    assert_eq!(summary.notified, 1);

    let sent = notifier.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "Printer Status Changed");
    assert!(sent[0].1.contains("voron"));
    assert_eq!(sent[0].2.as_deref(), Some("10.0.0.1"));
}

#[tokio::test]
async fn failed_polls_get_a_grace_period_before_offline() {
    let probe = Arc::new(MockProbe::new());
    let notifier = Arc::new(RecordingNotifier::new());
    probe.set_online("10.0.0.1", "flaky").await;
    probe.set_online("10.0.0.2", "steady").await;

    let monitor = spawn_monitor(
        MonitorPolicy::default(),
        vec![seed("10.0.0.1"), seed("10.0.0.2")],
        Arc::clone(&probe),
        Arc::clone(&notifier),
    );

    monitor.ask(Tick).await.unwrap();
    probe.set_failing("10.0.0.1").await;

    // failures 1 and 2 stay below the threshold of 3
    for _ in 0..2 {
        let summary = monitor.ask(Tick).await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.changed, 0);
    }
    assert_eq!(notifier.count().await, 0);

    // third consecutive failure flips the host offline
    let summary = monitor.ask(Tick).await.unwrap();
    assert_eq!(summary.changed, 1);
    assert_eq!(summary.notified, 1);

    let sent = notifier.sent.lock().await;
    assert_eq!(sent[0].0, "Printer Offline");
    assert!(sent[0].1.contains("flaky"));

    // the host is still tracked, just offline
    drop(sent);
    let hosts = monitor.ask(GetHosts).await.unwrap();
    assert_eq!(hosts.len(), 2);
    let flaky = hosts
        .iter()
        .find(|v| v.record.ip_address == "10.0.0.1")
        .unwrap();
    assert_eq!(flaky.status, Status::Offline);
    assert_eq!(flaky.record.consecutive_failures, 3);
}

#[tokio::test]
async fn fleet_wide_outage_collapses_to_one_alert() {
    let probe = Arc::new(MockProbe::new());
    let notifier = Arc::new(RecordingNotifier::new());
    for n in 1..=3 {
        probe.set_online(&format!("10.0.0.{n}"), &format!("printer-{n}")).await;
    }

    let policy = MonitorPolicy {
        failure_threshold: 1,
        gate: GatePolicy::default(),
        ..MonitorPolicy::default()
    };
    let monitor = spawn_monitor(
        policy,
        vec![seed("10.0.0.1"), seed("10.0.0.2"), seed("10.0.0.3")],
        Arc::clone(&probe),
        Arc::clone(&notifier),
    );

    monitor.ask(Tick).await.unwrap();

    // the whole switch goes away: one outage alert, not three offline ones
    for n in 1..=3 {
        probe.set_failing(&format!("10.0.0.{n}")).await;
    }
    let summary = monitor.ask(Tick).await.unwrap();
    assert_eq!(summary.changed, 3);
    assert_eq!(summary.notified, 1);
    assert_eq!(notifier.titles().await, vec!["Network Outage".to_string()]);
}

#[tokio::test]
async fn flapping_host_is_muted_after_repeated_flips() {
    let probe = Arc::new(MockProbe::new());
    let notifier = Arc::new(RecordingNotifier::new());
    probe.set_online("10.0.0.1", "flappy").await;
    probe.set_online("10.0.0.2", "steady").await;

    // threshold 1 makes every failed round an immediate offline flip
    let policy = MonitorPolicy {
        failure_threshold: 1,
        ..MonitorPolicy::default()
    };
    let monitor = spawn_monitor(
        policy,
        vec![seed("10.0.0.1"), seed("10.0.0.2")],
        Arc::clone(&probe),
        Arc::clone(&notifier),
    );

    monitor.ask(Tick).await.unwrap();

    // four flips alert normally, the fifth trips the oscillation detector
    let mut notified = Vec::new();
    for round in 0..5 {
        if round % 2 == 0 {
            probe.set_failing("10.0.0.1").await;
        } else {
            probe.set_online("10.0.0.1", "flappy").await;
        }
        let summary = monitor.ask(Tick).await.unwrap();
        assert_eq!(summary.changed, 1);
        notified.push(summary.notified);
    }
    assert_eq!(notified, vec![1, 1, 1, 1, 0]);
    assert_eq!(notifier.count().await, 4);

    // still muted: further transitions stay silent during the timeout
    probe.set_online("10.0.0.1", "flappy").await;
    let summary = monitor.ask(Tick).await.unwrap();
    assert_eq!(summary.changed, 1);
    assert_eq!(summary.notified, 0);
    assert_eq!(notifier.count().await, 4);
}

#[tokio::test]
async fn rename_survives_later_poll_rounds() {
    let probe = Arc::new(MockProbe::new());
    let notifier = Arc::new(RecordingNotifier::new());
    probe.set_online("10.0.0.1", "voron").await;

    let monitor = spawn_monitor(
        MonitorPolicy::default(),
        vec![seed("10.0.0.1")],
        Arc::clone(&probe),
        Arc::clone(&notifier),
    );

    // first round adopts the device-reported name
    monitor.ask(Tick).await.unwrap();
    let hosts = monitor.ask(GetHosts).await.unwrap();
    assert_eq!(hosts[0].record.display_name, "voron");

    let view = monitor
        .ask(RenameHost {
            ip: "10.0.0.1".to_string(),
            name: "Print Farm A".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(view.record.display_name, "Print Farm A");

    // further rounds keep the custom name while tracking the reported one
    monitor.ask(Tick).await.unwrap();
    let hosts = monitor.ask(GetHosts).await.unwrap();
    assert_eq!(hosts[0].record.display_name, "Print Farm A");
    assert_eq!(hosts[0].record.original_name, "voron");

    let err = monitor
        .ask(RenameHost {
            ip: "10.0.0.1".to_string(),
            name: "   ".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SendError::HandlerError(CoreError::InvalidName(_))
    ));
}

#[tokio::test]
async fn add_and_remove_host() {
    let probe = Arc::new(MockProbe::new());
    let notifier = Arc::new(RecordingNotifier::new());
    probe.set_online("10.0.0.7", "trident").await;

    let monitor = spawn_monitor(
        MonitorPolicy::default(),
        Vec::new(),
        Arc::clone(&probe),
        Arc::clone(&notifier),
    );

    let view = monitor
        .ask(AddHost {
            ip: "10.0.0.7".to_string(),
            name: None,
        })
        .await
        .unwrap();
    assert_eq!(view.record.display_name, "trident");
    assert_eq!(view.status, Status::Standby);
    assert_eq!(notifier.titles().await, vec!["New Printer Discovered".to_string()]);

    let err = monitor
        .ask(AddHost {
            ip: "10.0.0.7".to_string(),
            name: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SendError::HandlerError(CoreError::HostAlreadyExists(_))
    ));

    monitor
        .ask(RemoveHost {
            ip: "10.0.0.7".to_string(),
        })
        .await
        .unwrap();
    assert!(monitor.ask(GetHosts).await.unwrap().is_empty());

    let err = monitor
        .ask(RemoveHost {
            ip: "10.0.0.7".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SendError::HandlerError(CoreError::HostNotFound(_))
    ));
}

#[tokio::test]
async fn unreachable_host_is_added_offline() {
    let probe = Arc::new(MockProbe::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let monitor = spawn_monitor(
        MonitorPolicy::default(),
        Vec::new(),
        Arc::clone(&probe),
        Arc::clone(&notifier),
    );

    let view = monitor
        .ask(AddHost {
            ip: "10.0.0.42".to_string(),
            name: Some("basement".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(view.record.display_name, "basement");
    assert_eq!(view.record.consecutive_failures, 1);
    // below the threshold: not yet reported offline
    assert_ne!(view.status, Status::Offline);
}

#[tokio::test]
async fn polling_starts_and_stops() {
    let probe = Arc::new(MockProbe::new());
    let notifier = Arc::new(RecordingNotifier::new());
    probe.set_online("10.0.0.1", "voron").await;

    let monitor = spawn_monitor(
        MonitorPolicy::default(),
        vec![seed("10.0.0.1")],
        Arc::clone(&probe),
        Arc::clone(&notifier),
    );

    let info = monitor.ask(PollingStatus).await.unwrap();
    assert!(!info.polling);

    let err = monitor
        .ask(StartPolling {
            interval: Duration::ZERO,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SendError::HandlerError(CoreError::InvalidInterval(_))
    ));

    monitor
        .ask(StartPolling {
            interval: Duration::from_millis(20),
        })
        .await
        .unwrap();
    let info = monitor.ask(PollingStatus).await.unwrap();
    assert!(info.polling);
    assert_eq!(info.interval, Some(Duration::from_millis(20)));

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(probe.call_count() >= 2, "driver should have ticked");

    monitor.ask(StopPolling).await.unwrap();
    let info = monitor.ask(PollingStatus).await.unwrap();
    assert!(!info.polling);

    // let any in-flight round drain, then the counter must hold still
    tokio::time::sleep(Duration::from_millis(50)).await;
    let settled = probe.call_count();
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(probe.call_count(), settled);

    // stopping again is a no-op
    monitor.ask(StopPolling).await.unwrap();
}
