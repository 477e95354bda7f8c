pub mod control_loop;
pub mod monitor_detector;
pub mod pointer_tracker;
pub mod sensor;
pub mod settings_watcher;
pub mod topology_manager;
pub mod trigger_resolver;

#[cfg(test)]
mod test_support;

pub use control_loop::ControlLoop;
pub use monitor_detector::{create_monitor_source, MonitorWatcher};
pub use pointer_tracker::create_pointer_tracker;
pub use sensor::create_sensor_factory;
pub use settings_watcher::SettingsWatcher;
pub use topology_manager::TopologyManager;
