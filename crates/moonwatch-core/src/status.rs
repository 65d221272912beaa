//! Status derivation
//!
//! Maps one host record to one canonical status label. Devices report several
//! simultaneous boolean flags (a failing print carries both `error` and
//! `printing` for a moment), so a fixed priority order is applied to get one
//! deterministic label, favoring the most urgent condition.

use moonwatch_probe::KlippyState;

use crate::model::{Connectivity, HostRecord, Status};

/// Derive the canonical status for a host record
///
/// Pure and total: never fails, identical inputs always produce the same
/// status. Evaluation order, first match wins:
///
/// 1. unreachable per the last poll rounds
/// 2. consecutive failures reached the threshold
/// 3. Klippy fully disconnected from Moonraker
/// 4. no flags reported: fall back to the coarse Klippy state
/// 5. flags priority: cancelling > error > paused > printing > standby
#[must_use]
pub fn derive_status(record: &HostRecord, failure_threshold: u32) -> Status {
    if record.connectivity == Connectivity::Offline {
        return Status::Offline;
    }
    if record.consecutive_failures >= failure_threshold {
        return Status::Offline;
    }
    if record.klippy_state == Some(KlippyState::Disconnected) {
        return Status::Offline;
    }

    let Some(flags) = &record.flags else {
        return match record.klippy_state {
            Some(KlippyState::Shutdown) => Status::Offline,
            Some(KlippyState::Error) => Status::Error,
            _ => Status::Standby,
        };
    };

    if flags.cancelling {
        Status::Cancelling
    } else if flags.error {
        Status::Error
    } else if flags.paused {
        Status::Paused
    } else if flags.printing {
        Status::Printing
    } else {
        // `ready` and the no-flag default both land on standby
        Status::Standby
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use moonwatch_probe::PrinterFlags;

    use super::*;
    use crate::model::HostId;

    const THRESHOLD: u32 = 3;

    fn record() -> HostRecord {
        HostRecord {
            id: HostId::new("10.0.0.5"),
            ip_address: "10.0.0.5".to_string(),
            display_name: "voron".to_string(),
            original_name: "voron".to_string(),
            order: 0,
            connectivity: Connectivity::Online,
            klippy_state: Some(KlippyState::Ready),
            moonraker_version: None,
            flags: None,
            consecutive_failures: 0,
            last_seen_at: Utc::now(),
        }
    }

    #[test]
    fn offline_connectivity_wins_over_everything() {
        let mut r = record();
        r.connectivity = Connectivity::Offline;
        r.flags = Some(PrinterFlags {
            printing: true,
            ..PrinterFlags::default()
        });
        assert_eq!(derive_status(&r, THRESHOLD), Status::Offline);
    }

    #[test]
    fn failure_threshold_forces_offline() {
        let mut r = record();
        r.consecutive_failures = THRESHOLD;
        assert_eq!(derive_status(&r, THRESHOLD), Status::Offline);

        r.consecutive_failures = THRESHOLD - 1;
        assert_eq!(derive_status(&r, THRESHOLD), Status::Standby);
    }

    #[test]
    fn disconnected_klippy_is_offline() {
        let mut r = record();
        r.klippy_state = Some(KlippyState::Disconnected);
        r.flags = Some(PrinterFlags {
            ready: true,
            ..PrinterFlags::default()
        });
        assert_eq!(derive_status(&r, THRESHOLD), Status::Offline);
    }

    #[test]
    fn without_flags_falls_back_to_klippy_state() {
        let mut r = record();
        r.klippy_state = Some(KlippyState::Shutdown);
        assert_eq!(derive_status(&r, THRESHOLD), Status::Offline);

        r.klippy_state = Some(KlippyState::Error);
        assert_eq!(derive_status(&r, THRESHOLD), Status::Error);

        r.klippy_state = Some(KlippyState::Ready);
        assert_eq!(derive_status(&r, THRESHOLD), Status::Standby);

        r.klippy_state = None;
        assert_eq!(derive_status(&r, THRESHOLD), Status::Standby);
    }

    #[test]
    fn error_beats_printing() {
        let mut r = record();
        r.flags = Some(PrinterFlags {
            error: true,
            printing: true,
            ..PrinterFlags::default()
        });
        assert_eq!(derive_status(&r, THRESHOLD), Status::Error);
    }

    #[test]
    fn flag_priority_order() {
        let mut r = record();
        let mut flags = PrinterFlags {
            cancelling: true,
            error: true,
            paused: true,
            printing: true,
            ready: true,
            ..PrinterFlags::default()
        };
        r.flags = Some(flags.clone());
        assert_eq!(derive_status(&r, THRESHOLD), Status::Cancelling);

        flags.cancelling = false;
        r.flags = Some(flags.clone());
        assert_eq!(derive_status(&r, THRESHOLD), Status::Error);

        flags.error = false;
        r.flags = Some(flags.clone());
        assert_eq!(derive_status(&r, THRESHOLD), Status::Paused);

        flags.paused = false;
        r.flags = Some(flags.clone());
        assert_eq!(derive_status(&r, THRESHOLD), Status::Printing);

        flags.printing = false;
        r.flags = Some(flags.clone());
        assert_eq!(derive_status(&r, THRESHOLD), Status::Standby);

        flags.ready = false;
        r.flags = Some(flags);
        assert_eq!(derive_status(&r, THRESHOLD), Status::Standby);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let r = record();
        assert_eq!(derive_status(&r, THRESHOLD), derive_status(&r, THRESHOLD));
    }
}
