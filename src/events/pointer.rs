use std::fmt;

/// Положение курсора в координатах виртуального рабочего стола
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for PointerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Канал последнего известного положения курсора (None - ещё неизвестно)
pub type PointerSender = tokio::sync::watch::Sender<Option<PointerPosition>>;
pub type PointerReceiver = tokio::sync::watch::Receiver<Option<PointerPosition>>;

pub fn pointer_channel() -> (PointerSender, PointerReceiver) {
    tokio::sync::watch::channel(None)
}
