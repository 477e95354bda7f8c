use crate::error::Result;
use crate::events::{ControlEvent, MonitorEvent};
use crate::services::settings_watcher::SettingsWatcher;
use crate::services::topology_manager::TopologyManager;
use crate::store::ConfigStore;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

/// Окно, в течение которого пачка уведомлений сливается в одну перестройку
const COALESCE_WINDOW: Duration = Duration::from_millis(100);

/// Единственный управляющий поток: все события топологии и настроек
/// приходят сюда по очереди, и только отсюда вызывается TopologyManager.
pub struct ControlLoop {
    manager: TopologyManager,
    store: Arc<dyn ConfigStore>,
    settings_watcher: Option<SettingsWatcher>,
    events: UnboundedReceiver<ControlEvent>,
}

impl ControlLoop {
    pub fn new(
        manager: TopologyManager,
        store: Arc<dyn ConfigStore>,
        settings_watcher: Option<SettingsWatcher>,
        events: UnboundedReceiver<ControlEvent>,
    ) -> Self {
        Self {
            manager,
            store,
            settings_watcher,
            events,
        }
    }

    /// Работает до сигнала `shutdown` или закрытия всех источников событий,
    /// затем останавливает все сенсоры.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Result<()> {
        info!("Управляющий цикл запущен");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Получен сигнал завершения");
                    break;
                }
                event = self.events.recv() => {
                    let Some(first) = event else {
                        info!("Все источники событий закрыты");
                        break;
                    };
                    let batch = self.collect_batch(first).await;
                    self.apply(batch).await;
                }
            }
        }

        self.manager.shutdown();
        Ok(())
    }

    async fn collect_batch(&mut self, first: ControlEvent) -> Vec<ControlEvent> {
        let mut batch = vec![first];

        sleep(COALESCE_WINDOW).await;
        while let Ok(event) = self.events.try_recv() {
            batch.push(event);
        }

        debug!("Пачка управляющих событий: {}", batch.len());
        batch
    }

    /// Применить пачку событий: заново поставить наблюдение за файлом,
    /// перечитать настройки, затем перестроить сенсоры.
    pub async fn apply(&mut self, batch: Vec<ControlEvent>) {
        let settings_changed = batch
            .iter()
            .any(|event| matches!(event, ControlEvent::SettingsChanged));

        if settings_changed {
            // Наблюдение ставится до чтения: замена файла во время `sync`
            // придёт следующим событием
            if let Some(watcher) = self.settings_watcher.as_mut() {
                if let Err(e) = watcher.rearm().await {
                    error!("Не удалось восстановить наблюдение за {:?}: {}", watcher.path(), e);
                }
            }

            if let Err(e) = self.store.sync() {
                error!("Не удалось перечитать настройки, используем прежние: {}", e);
            }
        }

        let monitor_events: Vec<MonitorEvent> = batch
            .into_iter()
            .filter_map(|event| match event {
                ControlEvent::Monitor(event) => Some(event),
                ControlEvent::SettingsChanged => None,
            })
            .collect();

        if monitor_events.is_empty() {
            if settings_changed {
                self.manager.on_config_changed();
            }
            return;
        }

        for event in &monitor_events {
            self.manager.handle_monitor_event(event);
        }
    }
}
