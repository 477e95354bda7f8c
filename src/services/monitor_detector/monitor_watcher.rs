use crate::error::Result;
use crate::events::{ControlEvent, Monitor, MonitorEvent};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use super::r#trait::MonitorSource;

/// Опрашивает источник мониторов и превращает различия в события
/// подключения/отключения для управляющего потока.
pub struct MonitorWatcher {
    source: Arc<dyn MonitorSource>,
    polling_interval: Duration,
    events: UnboundedSender<ControlEvent>,
    known: Vec<Monitor>,
}

impl MonitorWatcher {
    /// `known` - мониторы, уже учтённые получателем событий
    pub fn new(
        source: Arc<dyn MonitorSource>,
        polling_interval: Duration,
        known: Vec<Monitor>,
        events: UnboundedSender<ControlEvent>,
    ) -> Self {
        Self {
            source,
            polling_interval,
            events,
            known,
        }
    }

    /// Изменение геометрии монитора - это отключение и повторное подключение
    pub fn diff(old: &[Monitor], new: &[Monitor]) -> Vec<MonitorEvent> {
        let removed = old
            .iter()
            .filter(|monitor| !new.contains(monitor))
            .cloned()
            .map(MonitorEvent::Removed);
        let added = new
            .iter()
            .filter(|monitor| !old.contains(monitor))
            .cloned()
            .map(MonitorEvent::Added);

        removed.chain(added).collect()
    }

    /// Завершается, когда управляющий поток закрыл канал событий
    pub async fn run(mut self) -> Result<()> {
        info!(
            "MonitorWatcher запущен (мониторов: {}, интервал: {:?})",
            self.known.len(),
            self.polling_interval
        );

        let mut ticker = interval(self.polling_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let current = match self.source.enumerate() {
                Ok(monitors) => monitors,
                Err(e) => {
                    warn!("Не удалось опросить мониторы: {}; повторим позже", e);
                    continue;
                }
            };

            for event in Self::diff(&self.known, &current) {
                info!("Топология мониторов: {}", event);
                if self.events.send(event.into()).is_err() {
                    info!("Управляющий поток завершён, MonitorWatcher останавливается");
                    return Ok(());
                }
            }

            self.known = current;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Rect;
    use parking_lot::Mutex;

    struct ScriptedSource {
        monitors: Mutex<Vec<Monitor>>,
    }

    impl MonitorSource for ScriptedSource {
        fn enumerate(&self) -> Result<Vec<Monitor>> {
            Ok(self.monitors.lock().clone())
        }
    }

    fn dp1() -> Monitor {
        Monitor::new("DP-1", Rect::new(0, 0, 1920, 1080))
    }

    fn hdmi() -> Monitor {
        Monitor::new("HDMI-1", Rect::new(1920, 0, 1280, 1024))
    }

    #[test]
    fn test_diff_added_and_removed() {
        let events = MonitorWatcher::diff(&[dp1()], &[hdmi()]);
        assert_eq!(events, vec![MonitorEvent::Removed(dp1()), MonitorEvent::Added(hdmi())]);

        assert!(MonitorWatcher::diff(&[dp1(), hdmi()], &[hdmi(), dp1()]).is_empty());
    }

    #[test]
    fn test_diff_geometry_change() {
        let moved = Monitor::new("DP-1", Rect::new(0, 0, 2560, 1440));
        let events = MonitorWatcher::diff(&[dp1()], &[moved.clone()]);

        assert_eq!(events, vec![MonitorEvent::Removed(dp1()), MonitorEvent::Added(moved)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_emits_hotplug_events() {
        let source = Arc::new(ScriptedSource {
            monitors: Mutex::new(vec![dp1()]),
        });
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let watcher = MonitorWatcher::new(source.clone(), Duration::from_millis(100), vec![dp1()], tx);
        let handle = tokio::spawn(watcher.run());

        source.monitors.lock().push(hdmi());
        let event = rx.recv().await.unwrap();
        assert_eq!(event, ControlEvent::Monitor(MonitorEvent::Added(hdmi())));

        source.monitors.lock().remove(0);
        let event = rx.recv().await.unwrap();
        assert_eq!(event, ControlEvent::Monitor(MonitorEvent::Removed(dp1())));

        drop(rx);
        source.monitors.lock().clear();
        assert!(handle.await.unwrap().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_before_start_is_reported() {
        // Монитор подключили между сборкой сенсоров и запуском наблюдателя
        let source = Arc::new(ScriptedSource {
            monitors: Mutex::new(vec![dp1(), hdmi()]),
        });
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let watcher = MonitorWatcher::new(source, Duration::from_millis(100), vec![dp1()], tx);
        let handle = tokio::spawn(watcher.run());

        let event = rx.recv().await.unwrap();
        assert_eq!(event, ControlEvent::Monitor(MonitorEvent::Added(hdmi())));

        drop(rx);
        handle.abort();
    }
}
