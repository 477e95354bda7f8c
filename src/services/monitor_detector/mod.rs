//! MonitorDetector service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for enumerating the
//! connected monitors and turning topology differences into MonitorEvent(s).
//! It MUST NOT compute zones or touch sensors. All rebuild decisions are made
//! exclusively by TopologyManager on the control thread.

mod dry_run;
mod monitor_watcher;
mod sway;
mod xrandr;
mod r#trait;

pub use self::monitor_watcher::MonitorWatcher;
pub use self::r#trait::{create_monitor_source, MonitorSource};
