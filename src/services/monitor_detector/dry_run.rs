use crate::error::Result;
use crate::events::{Monitor, Rect};
use std::time::{Duration, Instant};

use super::r#trait::MonitorSource;

/// Период эмуляции подключения/отключения второго монитора
const HOTPLUG_PERIOD: Duration = Duration::from_secs(30);

/// Dry-run: основной монитор есть всегда, второй появляется и исчезает
/// каждые 30 секунд.
pub struct DryRunMonitorSource {
    started: Instant,
}

impl DryRunMonitorSource {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    fn monitors_at(elapsed: Duration) -> Vec<Monitor> {
        let mut monitors = vec![Monitor::new("DRY-1", Rect::new(0, 0, 1920, 1080))];

        if (elapsed.as_secs() / HOTPLUG_PERIOD.as_secs()) % 2 == 1 {
            monitors.push(Monitor::new("DRY-2", Rect::new(1920, 0, 1280, 1024)));
        }

        monitors
    }
}

impl MonitorSource for DryRunMonitorSource {
    fn enumerate(&self) -> Result<Vec<Monitor>> {
        Ok(Self::monitors_at(self.started.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_monitor_toggles() {
        assert_eq!(DryRunMonitorSource::monitors_at(Duration::from_secs(5)).len(), 1);
        assert_eq!(DryRunMonitorSource::monitors_at(Duration::from_secs(35)).len(), 2);
        assert_eq!(DryRunMonitorSource::monitors_at(Duration::from_secs(65)).len(), 1);
    }
}
