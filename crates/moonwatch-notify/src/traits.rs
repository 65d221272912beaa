//! Notifier trait

use async_trait::async_trait;

use crate::error::NotifyError;

/// Fire-and-forget alert sink
///
/// Dispatch failures are reported as `NotifyError` so the caller can log
/// them; they must never abort a poll round.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one alert; `host_ip` is set for per-host alerts
    async fn notify(
        &self,
        title: &str,
        body: &str,
        host_ip: Option<&str>,
    ) -> Result<(), NotifyError>;

    /// Implementation identifier for logging
    fn notifier_type(&self) -> &'static str;
}
