//! Log-only notifier for headless deployments

use async_trait::async_trait;
use tracing::info;

use crate::error::NotifyError;
use crate::traits::Notifier;

/// Notifier that writes alerts to the tracing log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        title: &str,
        body: &str,
        host_ip: Option<&str>,
    ) -> Result<(), NotifyError> {
        match host_ip {
            Some(ip) => info!(host = %ip, title = %title, body = %body, "notification"),
            None => info!(title = %title, body = %body, "notification"),
        }
        Ok(())
    }

    fn notifier_type(&self) -> &'static str {
        "log"
    }
}
