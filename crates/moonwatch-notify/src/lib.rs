//! moonwatch-notify: Outbound notification abstraction
//!
//! Provides the `Notifier` trait plus a desktop implementation (native
//! notifications) and a log-only implementation for headless deployments.

pub mod desktop;
pub mod error;
pub mod log;
pub mod traits;

pub use desktop::DesktopNotifier;
pub use error::NotifyError;
pub use log::LogNotifier;
pub use traits::Notifier;
