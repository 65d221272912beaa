//! Host probe trait

use async_trait::async_trait;

use crate::error::ProbeError;
use crate::snapshot::RawSnapshot;

/// Single-host status probe
///
/// One call corresponds to one poll attempt for one host. Ordinary network
/// failures come back as `ProbeError`, never as a panic, so a bad host can
/// only ever fail its own slot in a poll round.
#[async_trait]
pub trait HostProbe: Send + Sync {
    /// Probe the host at `ip` and return its current snapshot
    async fn probe(&self, ip: &str) -> Result<RawSnapshot, ProbeError>;

    /// Implementation identifier for logging
    fn probe_type(&self) -> &'static str;
}
