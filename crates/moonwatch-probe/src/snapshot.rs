//! Snapshot types for one poll result

use serde::{Deserialize, Serialize};

/// Klippy firmware state as reported by Moonraker `server/info`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KlippyState {
    Ready,
    Startup,
    Shutdown,
    Error,
    Disconnected,
    /// Anything a future Moonraker version might report
    #[serde(other)]
    Unknown,
}

impl KlippyState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            KlippyState::Ready => "ready",
            KlippyState::Startup => "startup",
            KlippyState::Shutdown => "shutdown",
            KlippyState::Error => "error",
            KlippyState::Disconnected => "disconnected",
            KlippyState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for KlippyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Printer status flags from the OctoPrint-compatible `api/printer` endpoint
///
/// Several flags can be true at the same time (a failing print reports both
/// `error` and `printing` mid-transition); consumers must apply a fixed
/// priority order to get a single label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterFlags {
    #[serde(default)]
    pub operational: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub printing: bool,
    #[serde(default)]
    pub cancelling: bool,
    #[serde(default)]
    pub pausing: bool,
    #[serde(default)]
    pub resuming: bool,
    #[serde(default, rename = "sdReady")]
    pub sd_ready: bool,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub ready: bool,
    #[serde(default, rename = "closedOrError")]
    pub closed_or_error: bool,
}

/// One successful poll result for one host at one point in time
///
/// Carries no host identity beyond the address; reconciliation joins it back
/// to the tracked record by `ip_address`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSnapshot {
    /// Address the probe was issued against
    pub ip_address: String,
    /// Hostname the device reported (falls back to the address)
    pub name: String,
    /// Klippy firmware state
    pub klippy_state: KlippyState,
    /// Moonraker version string
    pub moonraker_version: Option<String>,
    /// Status flags, when the flags endpoint answered
    pub flags: Option<PrinterFlags>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn klippy_state_parses_moonraker_strings() {
        let s: KlippyState = serde_json::from_str("\"ready\"").unwrap();
        assert_eq!(s, KlippyState::Ready);
        let s: KlippyState = serde_json::from_str("\"disconnected\"").unwrap();
        assert_eq!(s, KlippyState::Disconnected);
    }

    #[test]
    fn klippy_state_tolerates_unknown_strings() {
        let s: KlippyState = serde_json::from_str("\"hibernating\"").unwrap();
        assert_eq!(s, KlippyState::Unknown);
    }

    #[test]
    fn printer_flags_parse_octoprint_names() {
        let flags: PrinterFlags = serde_json::from_str(
            r#"{
                "operational": true,
                "paused": false,
                "printing": true,
                "cancelling": false,
                "pausing": false,
                "resuming": false,
                "sdReady": true,
                "error": false,
                "ready": false,
                "closedOrError": false
            }"#,
        )
        .unwrap();
        assert!(flags.printing);
        assert!(flags.sd_ready);
        assert!(!flags.closed_or_error);
    }

    #[test]
    fn printer_flags_default_missing_fields() {
        let flags: PrinterFlags = serde_json::from_str(r#"{"printing": true}"#).unwrap();
        assert!(flags.printing);
        assert!(!flags.error);
    }
}
