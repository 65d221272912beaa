//! Configuration loading and types

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use moonwatch_core::{GatePolicy, MonitorPolicy, NotificationToggles, SeedHost};

/// Top-level configuration for the moonwatch daemon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Daemon server settings
    #[serde(default)]
    pub daemon: DaemonConfig,
    /// Polling and alerting settings
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Per-status alert toggles
    #[serde(default)]
    pub notifications: NotificationToggles,
    /// Hosts to track from startup
    #[serde(default)]
    pub host: Vec<SeedHost>,
}

/// Daemon server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Address and port to bind to
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which alert sink to use
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Desktop notifications via the system notification daemon
    #[default]
    Desktop,
    /// Structured log lines only, for headless deployments
    Log,
}

/// Polling and alerting settings
///
/// Durations are plain seconds in the file; `outage_fraction` is a 0..=1
/// share of the fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Start polling immediately on daemon startup
    #[serde(default = "default_autostart")]
    pub autostart: bool,
    #[serde(default)]
    pub notifier: NotifierKind,
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    #[serde(default = "default_oscillation_window")]
    pub oscillation_window_seconds: u64,
    #[serde(default = "default_oscillation_threshold")]
    pub oscillation_threshold: usize,
    #[serde(default = "default_instability_timeout")]
    pub instability_timeout_seconds: u64,
    #[serde(default = "default_outage_fraction")]
    pub outage_fraction: f64,
    #[serde(default = "default_outage_window")]
    pub outage_window_seconds: u64,
    #[serde(default = "default_duplicate_window")]
    pub duplicate_window_seconds: u64,
    #[serde(default = "default_duplicate_cap")]
    pub duplicate_cap: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            autostart: default_autostart(),
            notifier: NotifierKind::default(),
            failure_threshold: default_failure_threshold(),
            oscillation_window_seconds: default_oscillation_window(),
            oscillation_threshold: default_oscillation_threshold(),
            instability_timeout_seconds: default_instability_timeout(),
            outage_fraction: default_outage_fraction(),
            outage_window_seconds: default_outage_window(),
            duplicate_window_seconds: default_duplicate_window(),
            duplicate_cap: default_duplicate_cap(),
        }
    }
}

fn default_poll_interval() -> u64 {
    3
}

fn default_autostart() -> bool {
    true
}

fn default_failure_threshold() -> u32 {
    3
}

fn default_oscillation_window() -> u64 {
    60
}

fn default_oscillation_threshold() -> usize {
    4
}

fn default_instability_timeout() -> u64 {
    300
}

fn default_outage_fraction() -> f64 {
    0.70
}

fn default_outage_window() -> u64 {
    300
}

fn default_duplicate_window() -> u64 {
    60
}

fn default_duplicate_cap() -> u32 {
    3
}

impl MonitorConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

impl Config {
    /// Build the monitor policy from the file settings
    #[must_use]
    pub fn policy(&self) -> MonitorPolicy {
        MonitorPolicy {
            failure_threshold: self.monitor.failure_threshold,
            gate: GatePolicy {
                oscillation_window: Duration::from_secs(self.monitor.oscillation_window_seconds),
                oscillation_threshold: self.monitor.oscillation_threshold,
                instability_timeout: Duration::from_secs(
                    self.monitor.instability_timeout_seconds,
                ),
                outage_fraction: self.monitor.outage_fraction,
                outage_window: Duration::from_secs(self.monitor.outage_window_seconds),
                duplicate_window: Duration::from_secs(self.monitor.duplicate_window_seconds),
                duplicate_cap: self.monitor.duplicate_cap,
            },
            notifications: self.notifications.clone(),
        }
    }

    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &PathBuf) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from default paths or use defaults
    ///
    /// # Errors
    /// Returns error if an existing file cannot be read or parsed
    pub fn load_default() -> eyre::Result<Self> {
        // Check environment variable
        if let Ok(path) = std::env::var("MOONWATCH_CONFIG") {
            return Self::load(&PathBuf::from(path));
        }

        // Try common paths
        let paths = [
            PathBuf::from("moonwatch.toml"),
            PathBuf::from("/etc/moonwatch/moonwatch.toml"),
            dirs::config_dir()
                .map(|p| p.join("moonwatch/moonwatch.toml"))
                .unwrap_or_default(),
        ];

        for path in paths {
            if path.exists() {
                return Self::load(&path);
            }
        }

        // Return default config if no file found
        tracing::warn!("no config file found, using defaults");
        Ok(Config::default())
    }
}
