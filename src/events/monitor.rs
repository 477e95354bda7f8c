use serde::{Deserialize, Serialize};
use std::fmt;

/// Прямоугольник в координатах виртуального рабочего стола
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Правая граница (не включительно)
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Нижняя граница (не включительно)
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        x >= self.x as i64 && x < self.right() && y >= self.y as i64 && y < self.bottom()
    }

    #[allow(dead_code)]
    pub fn intersects(&self, other: &Rect) -> bool {
        (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.bottom()
            && (other.y as i64) < self.bottom()
    }

    #[allow(dead_code)]
    pub fn is_within(&self, outer: &Rect) -> bool {
        self.x >= outer.x && self.y >= outer.y && self.right() <= outer.right() && self.bottom() <= outer.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Подключённый монитор. Ядро не хранит мониторы дольше одной перестройки.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Monitor {
    pub name: String,
    pub geometry: Rect,
}

impl Monitor {
    pub fn new(name: impl Into<String>, geometry: Rect) -> Self {
        Self {
            name: name.into(),
            geometry,
        }
    }
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.geometry)
    }
}

/// Изменение топологии мониторов
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    Added(Monitor),
    Removed(Monitor),
}

impl fmt::Display for MonitorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorEvent::Added(monitor) => write!(f, "подключён {}", monitor),
            MonitorEvent::Removed(monitor) => write!(f, "отключён {}", monitor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10, 20, 5, 5);

        assert!(rect.contains(10, 20));
        assert!(rect.contains(14, 24));
        assert!(!rect.contains(15, 24));
        assert!(!rect.contains(14, 25));
        assert!(!rect.contains(9, 20));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0, 0, 5, 5);

        assert!(a.intersects(&Rect::new(4, 4, 5, 5)));
        assert!(!a.intersects(&Rect::new(5, 0, 5, 5)));
        assert!(!a.intersects(&Rect::new(0, 5, 5, 5)));
    }

    #[test]
    fn test_rect_within_negative_origin() {
        let monitor = Rect::new(-1920, 0, 1920, 1080);

        assert!(Rect::new(-1920, 0, 5, 5).is_within(&monitor));
        assert!(!Rect::new(-5, 0, 10, 5).is_within(&monitor));
    }

    #[test]
    fn test_monitor_display() {
        let monitor = Monitor::new("DP-1", Rect::new(0, 0, 1920, 1080));
        assert_eq!(monitor.to_string(), "DP-1 (1920x1080+0+0)");
    }
}
