use crate::events::{PointerReceiver, Rect};
use std::fmt;
use std::sync::Arc;

use super::dwell_sensor::DwellSensorFactory;
use super::executor::create_action_executor;

/// Параметры, с которыми создаётся сенсор
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SensorSpec {
    /// Ключ зоны `<монитор>/<зона>`
    pub zone_key: String,
    pub rect: Rect,
    pub action: String,
    pub delay_ms: u64,
}

impl fmt::Display for SensorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> \"{}\" через {}мс",
            self.zone_key, self.rect, self.action, self.delay_ms
        )
    }
}

/// Работающий сенсор зоны, принадлежит TopologyManager
pub trait Sensor: Send {
    fn spec(&self) -> &SensorSpec;

    /// Остановить таймер и больше никогда не выполнять действие
    fn stop(&mut self);
}

/// Создаёт и запускает сенсоры. Входные параметры уже проверены.
pub trait SensorFactory: Send {
    fn create(&self, spec: SensorSpec) -> Box<dyn Sensor>;
}

/// Factory function to create a sensor factory based on the dry_run flag
pub fn create_sensor_factory(
    pointer: PointerReceiver,
    dry_run: bool,
) -> Box<dyn SensorFactory> {
    let executor = create_action_executor(dry_run);
    Box::new(DwellSensorFactory::new(pointer, Arc::from(executor)))
}
