pub mod monitor;
pub mod pointer;

pub use monitor::{Monitor, MonitorEvent, Rect};
pub use pointer::{pointer_channel, PointerPosition, PointerReceiver, PointerSender};

/// События, которые сериализуются на единственный управляющий поток
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    Monitor(MonitorEvent),
    SettingsChanged,
}

impl From<MonitorEvent> for ControlEvent {
    fn from(event: MonitorEvent) -> Self {
        ControlEvent::Monitor(event)
    }
}
