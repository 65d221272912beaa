//! Moonraker HTTP probe
//!
//! Talks to the Moonraker API of a single printer controller. Liveness comes
//! from `server/info`, the reported hostname from `printer/info`, and the
//! status flags from the OctoPrint-compatible `api/printer` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProbeError;
use crate::snapshot::{KlippyState, PrinterFlags, RawSnapshot};
use crate::traits::HostProbe;

/// Default Moonraker API port
pub const MOONRAKER_PORT: u16 = 7125;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ServerInfo {
    result: ServerInfoResult,
}

#[derive(Debug, Deserialize)]
struct ServerInfoResult {
    klippy_state: KlippyState,
    #[serde(default)]
    moonraker_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PrinterInfo {
    result: PrinterInfoResult,
}

#[derive(Debug, Deserialize)]
struct PrinterInfoResult {
    #[serde(default)]
    hostname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPrinter {
    state: ApiPrinterState,
}

#[derive(Debug, Deserialize)]
struct ApiPrinterState {
    flags: PrinterFlags,
}

/// HTTP probe against the Moonraker API
pub struct MoonrakerProbe {
    client: reqwest::Client,
    port: u16,
    timeout: Duration,
}

impl MoonrakerProbe {
    /// Create a probe with the default port and timeout
    ///
    /// # Errors
    /// Returns `ProbeError` if the HTTP client cannot be constructed
    pub fn new() -> Result<Self, ProbeError> {
        Self::with_settings(MOONRAKER_PORT, DEFAULT_TIMEOUT)
    }

    /// Create a probe with a custom port and timeout
    ///
    /// # Errors
    /// Returns `ProbeError` if the HTTP client cannot be constructed
    pub fn with_settings(port: u16, timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            port,
            timeout,
        })
    }

    fn url(&self, ip: &str, endpoint: &str) -> String {
        format!("http://{}:{}/{}", ip, self.port, endpoint)
    }

    fn map_transport_error(&self, e: &reqwest::Error) -> ProbeError {
        if e.is_timeout() {
            ProbeError::Timeout {
                timeout: self.timeout,
            }
        } else if e.is_connect() {
            ProbeError::ConnectionFailed(e.to_string())
        } else {
            ProbeError::Network(e.to_string())
        }
    }

    async fn get_json(&self, ip: &str, endpoint: &str) -> Result<serde_json::Value, ProbeError> {
        let response = self
            .client
            .get(self.url(ip, endpoint))
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProbeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProbeError::Parse(e.to_string()))
    }

    /// Fetch the status flags, tolerating hosts without the compat endpoint
    async fn fetch_flags(&self, ip: &str) -> Option<PrinterFlags> {
        match self.get_json(ip, "api/printer").await {
            Ok(value) => match serde_json::from_value::<ApiPrinter>(value) {
                Ok(api) => Some(api.state.flags),
                Err(e) => {
                    debug!(host = %ip, error = %e, "printer flags not parseable");
                    None
                }
            },
            Err(e) => {
                debug!(host = %ip, error = %e, "printer flags unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl HostProbe for MoonrakerProbe {
    async fn probe(&self, ip: &str) -> Result<RawSnapshot, ProbeError> {
        // server/info is the liveness check; everything after it is
        // best-effort enrichment.
        let server_info = self.get_json(ip, "server/info").await?;
        let server_info: ServerInfo = serde_json::from_value(server_info)
            .map_err(|e| ProbeError::Parse(e.to_string()))?;

        let name = match self.get_json(ip, "printer/info").await {
            Ok(value) => serde_json::from_value::<PrinterInfo>(value)
                .ok()
                .and_then(|info| info.result.hostname)
                .unwrap_or_else(|| ip.to_string()),
            Err(e) => {
                debug!(host = %ip, error = %e, "printer info unavailable");
                ip.to_string()
            }
        };

        let flags = self.fetch_flags(ip).await;

        Ok(RawSnapshot {
            ip_address: ip.to_string(),
            name,
            klippy_state: server_info.result.klippy_state,
            moonraker_version: server_info.result.moonraker_version,
            flags,
        })
    }

    fn probe_type(&self) -> &'static str {
        "moonraker"
    }
}
