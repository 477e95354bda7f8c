//! Подделки сервисов для тестов TopologyManager и управляющего цикла.

use crate::error::{LeadError, Result};
use crate::events::{Monitor, Rect};
use crate::services::monitor_detector::MonitorSource;
use crate::services::sensor::{Sensor, SensorFactory, SensorSpec};
use crate::store::StoreValue;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Мониторы задаются тестом; None - ошибка перечисления
#[derive(Clone, Default)]
pub struct FakeMonitors {
    current: Arc<Mutex<Option<Vec<Monitor>>>>,
}

impl FakeMonitors {
    pub fn set(&self, monitors: Option<Vec<Monitor>>) {
        *self.current.lock() = monitors;
    }
}

impl MonitorSource for FakeMonitors {
    fn enumerate(&self) -> Result<Vec<Monitor>> {
        match self.current.lock().clone() {
            Some(monitors) => Ok(monitors),
            None => Err(LeadError::MonitorEnumeration("display gone".to_string())),
        }
    }
}

struct FakeSensor {
    spec: SensorSpec,
    live: Arc<AtomicUsize>,
    running: bool,
}

impl Sensor for FakeSensor {
    fn spec(&self) -> &SensorSpec {
        &self.spec
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for FakeSensor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Считает живые сенсоры и запоминает их число в момент каждого создания
#[derive(Clone, Default)]
pub struct RecordingFactory {
    pub live: Arc<AtomicUsize>,
    pub live_at_create: Arc<Mutex<Vec<usize>>>,
}

impl RecordingFactory {
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.live_at_create.lock().len()
    }
}

impl SensorFactory for RecordingFactory {
    fn create(&self, spec: SensorSpec) -> Box<dyn Sensor> {
        let live = self.live.fetch_add(1, Ordering::SeqCst);
        self.live_at_create.lock().push(live);
        Box::new(FakeSensor {
            spec,
            live: self.live.clone(),
            running: true,
        })
    }
}

pub fn two_monitors() -> Vec<Monitor> {
    vec![
        Monitor::new("DP-1", Rect::new(0, 0, 1920, 1080)),
        Monitor::new("HDMI-1", Rect::new(1920, 0, 1280, 1024)),
    ]
}

pub fn two_monitor_config() -> Vec<(&'static str, StoreValue)> {
    vec![
        ("DP-1/topLeft", "lock".into()),
        ("DP-1/right", "menu;notes".into()),
        ("HDMI-1/bottom", "lock".into()),
        ("lock/action", "loginctl lock-session".into()),
        ("lock/delay", StoreValue::Integer(500)),
        ("menu/action", "rofi -show drun".into()),
        ("menu/delay", StoreValue::Integer(200)),
        ("notes/action", "xdg-open ~/notes".into()),
        ("notes/delay", StoreValue::Integer(1000)),
    ]
}

/// Слой tracing, собирающий тексты событий уровня WARN и выше
struct WarningCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for WarningCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() <= Level::WARN {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.messages.lock().push(visitor.0);
        }
    }
}

/// Выполнить `f` и вернуть все предупреждения и ошибки, записанные в лог
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(WarningCapture {
        messages: messages.clone(),
    });

    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = messages.lock().clone();
    (result, captured)
}
