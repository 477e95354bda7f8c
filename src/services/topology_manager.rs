use crate::error::Result;
use crate::events::{Monitor, MonitorEvent};
use crate::services::monitor_detector::MonitorSource;
use crate::services::sensor::{Sensor, SensorFactory, SensorSpec};
use crate::services::trigger_resolver::TriggerResolver;
use crate::store::ConfigStore;
use crate::zones::ZoneGeometry;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Владеет полным набором живых сенсоров и пересобирает его целиком при
/// любом изменении мониторов или настроек.
///
/// Вызывается только с управляющего потока: перестройки не выполняются
/// параллельно друг с другом.
pub struct TopologyManager {
    monitors: Arc<dyn MonitorSource>,
    factory: Box<dyn SensorFactory>,
    resolver: TriggerResolver,
    geometry: ZoneGeometry,
    sensors: Vec<Box<dyn Sensor>>,
    /// Мониторы, по которым собран текущий набор
    layout: Vec<Monitor>,
}

impl TopologyManager {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        monitors: Arc<dyn MonitorSource>,
        factory: Box<dyn SensorFactory>,
        geometry: ZoneGeometry,
    ) -> Self {
        info!("Инициализация TopologyManager (толщина зон: {})", geometry.thickness());

        let mut manager = Self {
            monitors,
            factory,
            resolver: TriggerResolver::new(store),
            geometry,
            sensors: Vec::new(),
            layout: Vec::new(),
        };

        if let Err(e) = manager.reload_all() {
            error!("Начальная загрузка сенсоров не удалась: {}", e);
        }

        manager
    }

    pub fn handle_monitor_event(&mut self, event: &MonitorEvent) {
        match event {
            MonitorEvent::Added(monitor) => self.on_monitor_added(monitor),
            MonitorEvent::Removed(monitor) => self.on_monitor_removed(monitor),
        }
    }

    /// Подключение монитора тоже ведёт к полной перестройке
    pub fn on_monitor_added(&mut self, monitor: &Monitor) {
        info!("Подключён монитор {}", monitor);
        self.reload_logged();
    }

    pub fn on_monitor_removed(&mut self, monitor: &Monitor) {
        info!("Отключён монитор {}", monitor);
        self.reload_logged();
    }

    pub fn on_config_changed(&mut self) {
        info!("Настройки изменились, перестраиваем сенсоры");
        self.reload_logged();
    }

    fn reload_logged(&mut self) {
        if let Err(e) = self.reload_all() {
            error!("Перестройка сенсоров прервана: {}", e);
        }
    }

    /// Остановить все сенсоры и собрать новый набор по текущим мониторам
    /// и настройкам.
    ///
    /// Старый набор полностью останавливается до создания первого нового
    /// сенсора. Ошибка перечисления мониторов оставляет набор пустым.
    pub fn reload_all(&mut self) -> Result<usize> {
        self.stop_all();
        self.layout.clear();

        let monitors = self.monitors.enumerate()?;
        debug!("Перестройка для {} мониторов", monitors.len());

        let mut next: Vec<Box<dyn Sensor>> = Vec::new();
        for monitor in &monitors {
            let before = next.len();

            for (zone, rect) in self.geometry.zones(&monitor.geometry) {
                let zone_key = zone.key(&monitor.name);

                for trigger in self.resolver.resolve(&zone_key) {
                    info!("Загружен триггер '{}' для зоны {}", trigger.name, zone_key);
                    next.push(self.factory.create(SensorSpec {
                        zone_key: zone_key.clone(),
                        rect,
                        action: trigger.action,
                        delay_ms: trigger.delay_ms,
                    }));
                }
            }

            debug!("Монитор {}: {} сенсоров", monitor, next.len() - before);
        }

        self.sensors = next;
        self.layout = monitors;
        info!("Активно сенсоров: {}", self.sensors.len());
        Ok(self.sensors.len())
    }

    fn stop_all(&mut self) {
        let old = std::mem::take(&mut self.sensors);
        if !old.is_empty() {
            debug!("Остановка {} сенсоров", old.len());
        }

        for mut sensor in old {
            sensor.stop();
        }
    }

    /// Остановить все сенсоры при завершении процесса
    pub fn shutdown(&mut self) {
        info!("Остановка всех сенсоров ({})", self.sensors.len());
        self.stop_all();
    }

    pub fn sensors(&self) -> impl Iterator<Item = &SensorSpec> {
        self.sensors.iter().map(|sensor| sensor.spec())
    }

    /// Исходный список для MonitorWatcher: события считаются от того же
    /// перечисления, по которому собраны сенсоры
    pub fn monitors(&self) -> &[Monitor] {
        &self.layout
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }
}

impl Drop for TopologyManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}
