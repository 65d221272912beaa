//! Host reconciliation
//!
//! Merges one batch of fresh poll snapshots into the tracked host list.
//! Identity and user customizations survive every pass; only an explicit
//! delete removes a record.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use moonwatch_probe::RawSnapshot;

use crate::model::{Connectivity, HostRecord};

/// Merge a snapshot batch into the previous host list
///
/// - A previous record matched by a snapshot gets all device-reported fields
///   overwritten, its failure counter reset, and its `display_name` replaced
///   only when the user never customized it. `id` and `order` are untouched.
/// - A previous record with no snapshot in the batch counts one more failed
///   poll attempt. `connectivity` flips to offline only once the counter
///   reaches `failure_threshold`, giving transient failures a grace period.
///   A failed per-host poll and a host missing from the batch are the same
///   case here: the caller simply omits the snapshot.
/// - A snapshot with no previous record creates a new one; new hosts are
///   appended in batch order with `order` continuing past the current
///   maximum so their relative order stays stable.
///
/// Nothing in `previous` is ever dropped.
#[must_use]
pub fn reconcile(
    previous: Vec<HostRecord>,
    snapshots: Vec<RawSnapshot>,
    failure_threshold: u32,
    now: DateTime<Utc>,
) -> Vec<HostRecord> {
    let mut matched: HashMap<String, RawSnapshot> = HashMap::new();
    let mut fresh: Vec<RawSnapshot> = Vec::new();

    for snapshot in snapshots {
        if previous.iter().any(|h| h.ip_address == snapshot.ip_address) {
            // Last snapshot wins if a batch carries duplicates for one address
            matched.insert(snapshot.ip_address.clone(), snapshot);
        } else {
            fresh.push(snapshot);
        }
    }

    let mut next_order = previous
        .iter()
        .map(|h| h.order)
        .max()
        .map_or(0, |max| max + 1);

    let mut out = Vec::with_capacity(previous.len() + fresh.len());

    for mut host in previous {
        match matched.remove(&host.ip_address) {
            Some(snapshot) => {
                if !host.is_customized() {
                    host.display_name = snapshot.name.clone();
                }
                host.original_name = snapshot.name;
                host.connectivity = Connectivity::Online;
                host.klippy_state = Some(snapshot.klippy_state);
                host.moonraker_version = snapshot.moonraker_version;
                host.flags = snapshot.flags;
                host.consecutive_failures = 0;
                host.last_seen_at = now;
            }
            None => {
                host.consecutive_failures = host.consecutive_failures.saturating_add(1);
                if host.consecutive_failures >= failure_threshold {
                    host.connectivity = Connectivity::Offline;
                }
                host.last_seen_at = now;
            }
        }
        out.push(host);
    }

    for snapshot in fresh {
        out.push(HostRecord::from_snapshot(&snapshot, next_order, now));
        next_order += 1;
    }

    out
}
