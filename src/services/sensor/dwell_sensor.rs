use crate::debug_if_enabled;
use crate::events::{PointerReceiver, Rect};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::error;

use super::executor::ActionExecutor;
use super::r#trait::{Sensor, SensorFactory, SensorSpec};

/// Сенсор с таймером задержки.
///
/// Вход курсора в зону взводит таймер на `delay_ms`, выход сбрасывает его.
/// По истечении таймера действие выполняется один раз; следующий запуск
/// возможен только после выхода из зоны и повторного входа.
///
/// Действие выполняется под замком `stopped`: `stop()` дожидается
/// выполняющегося действия, и после его возврата сенсор больше не сработает.
pub struct DwellSensor {
    spec: SensorSpec,
    stopped: Arc<Mutex<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl DwellSensor {
    pub fn start(spec: SensorSpec, pointer: PointerReceiver, executor: Arc<dyn ActionExecutor>) -> Self {
        let stopped = Arc::new(Mutex::new(false));
        let handle = tokio::spawn(Self::dwell_task(
            spec.zone_key.clone(),
            spec.rect,
            spec.action.clone(),
            Duration::from_millis(spec.delay_ms),
            pointer,
            executor,
            stopped.clone(),
        ));

        Self {
            spec,
            stopped,
            handle: Some(handle),
        }
    }

    async fn dwell_task(
        zone_key: String,
        rect: Rect,
        action: String,
        delay: Duration,
        mut pointer: PointerReceiver,
        executor: Arc<dyn ActionExecutor>,
        stopped: Arc<Mutex<bool>>,
    ) {
        // Курсор, уже находящийся в зоне при создании, считается вошедшим
        let mut inside = Self::is_inside(&mut pointer, &rect);

        loop {
            if !inside && !Self::wait_until(&mut pointer, &rect, true).await {
                return;
            }

            debug_if_enabled!("Курсор вошёл в зону {}, ждём {:?}", zone_key, delay);

            tokio::select! {
                _ = sleep(delay) => {}
                open = Self::wait_until(&mut pointer, &rect, false) => {
                    if !open {
                        return;
                    }
                    debug_if_enabled!("Курсор покинул зону {} до срабатывания", zone_key);
                    inside = false;
                    continue;
                }
            }

            {
                let stopped = stopped.lock();
                if *stopped {
                    return;
                }
                if let Err(e) = executor.execute(&zone_key, &action) {
                    error!("Не удалось выполнить действие зоны {}: {}", zone_key, e);
                }
            }

            if !Self::wait_until(&mut pointer, &rect, false).await {
                return;
            }
            inside = false;
        }
    }

    fn is_inside(pointer: &mut PointerReceiver, rect: &Rect) -> bool {
        pointer
            .borrow_and_update()
            .map_or(false, |position| rect.contains(position.x, position.y))
    }

    /// Ждать, пока курсор окажется внутри (`want_inside`) или снаружи зоны.
    /// `false` - канал курсора закрыт.
    async fn wait_until(pointer: &mut PointerReceiver, rect: &Rect, want_inside: bool) -> bool {
        loop {
            if pointer.changed().await.is_err() {
                return false;
            }
            if Self::is_inside(pointer, rect) == want_inside {
                return true;
            }
        }
    }
}

impl Sensor for DwellSensor {
    fn spec(&self) -> &SensorSpec {
        &self.spec
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            // Ждём выполняющееся действие, если оно есть
            *self.stopped.lock() = true;
            handle.abort();
            debug_if_enabled!("Сенсор {} остановлен", self.spec.zone_key);
        }
    }
}

impl Drop for DwellSensor {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct DwellSensorFactory {
    pointer: PointerReceiver,
    executor: Arc<dyn ActionExecutor>,
}

impl DwellSensorFactory {
    pub fn new(pointer: PointerReceiver, executor: Arc<dyn ActionExecutor>) -> Self {
        Self { pointer, executor }
    }
}

impl SensorFactory for DwellSensorFactory {
    fn create(&self, spec: SensorSpec) -> Box<dyn Sensor> {
        Box::new(DwellSensor::start(spec, self.pointer.clone(), self.executor.clone()))
    }
}
