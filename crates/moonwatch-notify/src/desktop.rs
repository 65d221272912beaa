//! Native desktop notifications

use async_trait::async_trait;
use notify_rust::Notification;

use crate::error::NotifyError;
use crate::traits::Notifier;

/// Notifier backed by the platform notification service
pub struct DesktopNotifier {
    icon: String,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            icon: "printer".to_string(),
        }
    }

    /// Override the notification icon
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(
        &self,
        title: &str,
        body: &str,
        _host_ip: Option<&str>,
    ) -> Result<(), NotifyError> {
        let title = title.to_string();
        let body = body.to_string();
        let icon = self.icon.clone();

        // notify-rust blocks on the platform service
        tokio::task::spawn_blocking(move || {
            Notification::new()
                .summary(&title)
                .body(&body)
                .icon(&icon)
                .show()
                .map(|_| ())
                .map_err(|e| NotifyError::DispatchFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotifyError::TaskFailed(e.to_string()))?
    }

    fn notifier_type(&self) -> &'static str {
        "desktop"
    }
}
