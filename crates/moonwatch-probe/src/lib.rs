//! moonwatch-probe: Host polling abstraction
//!
//! Provides the `HostProbe` trait and the Moonraker HTTP implementation used
//! to check liveness and print state of a single printer controller.

pub mod error;
pub mod moonraker;
pub mod snapshot;
pub mod traits;

pub use error::ProbeError;
pub use moonraker::MoonrakerProbe;
pub use snapshot::{KlippyState, PrinterFlags, RawSnapshot};
pub use traits::HostProbe;
