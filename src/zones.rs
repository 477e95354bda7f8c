//! Геометрия горячих зон: восемь прямоугольников на монитор.
//!
//! Четыре краевые зоны занимают среднюю треть своей стороны, четыре угловые -
//! квадраты `thickness x thickness`. Зоны пересчитываются с нуля при каждой
//! перестройке и нигде не сохраняются.

use crate::events::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Формула левой зоны.
///
/// `Legacy` воспроизводит исторический прямоугольник `(0, x + h/3, T, h/3)`,
/// который на мониторах со смещением по X оказывается не на своём месте.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeftZoneMode {
    #[default]
    Symmetric,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Top,
    Right,
    Bottom,
    Left,
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Zone {
    /// Порядок обхода зон при перестройке
    pub const ALL: [Zone; 8] = [
        Zone::Top,
        Zone::Right,
        Zone::Bottom,
        Zone::Left,
        Zone::TopLeft,
        Zone::TopRight,
        Zone::BottomRight,
        Zone::BottomLeft,
    ];

    /// Имя зоны в файле настроек
    pub fn name(&self) -> &'static str {
        match self {
            Zone::Top => "top",
            Zone::Right => "right",
            Zone::Bottom => "bottom",
            Zone::Left => "left",
            Zone::TopLeft => "topLeft",
            Zone::TopRight => "topRight",
            Zone::BottomRight => "bottomRight",
            Zone::BottomLeft => "bottomLeft",
        }
    }

    /// Ключ списка триггеров зоны: `<монитор>/<зона>`
    pub fn key(&self, monitor_name: &str) -> String {
        format!("{}/{}", monitor_name, self.name())
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneGeometry {
    thickness: u32,
    left_zone: LeftZoneMode,
}

impl ZoneGeometry {
    pub fn new(thickness: u32, left_zone: LeftZoneMode) -> Self {
        Self { thickness, left_zone }
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    /// Восемь зон монитора в порядке `Zone::ALL`. Целочисленное деление
    /// усекает к нулю.
    pub fn zones(&self, monitor: &Rect) -> [(Zone, Rect); 8] {
        Zone::ALL.map(|zone| (zone, self.zone_rect(monitor, zone)))
    }

    pub fn zone_rect(&self, monitor: &Rect, zone: Zone) -> Rect {
        let t = self.thickness;
        let (x, y) = (monitor.x, monitor.y);
        let (w, h) = (monitor.width as i32, monitor.height as i32);
        let ti = t as i32;
        let (w3, h3) = (w / 3, h / 3);

        match zone {
            Zone::Top => Rect::new(x + w3, y, w3 as u32, t),
            Zone::Right => Rect::new(x + w - ti, y + h3, t, h3 as u32),
            Zone::Bottom => Rect::new(x + w3, y + h - ti, w3 as u32, t),
            Zone::Left => match self.left_zone {
                LeftZoneMode::Symmetric => Rect::new(x, y + h3, t, h3 as u32),
                LeftZoneMode::Legacy => Rect::new(0, x + h3, t, h3 as u32),
            },
            Zone::TopLeft => Rect::new(x, y, t, t),
            Zone::TopRight => Rect::new(x + w - ti, y, t, t),
            Zone::BottomRight => Rect::new(x + w - ti, y + h - ti, t, t),
            Zone::BottomLeft => Rect::new(x, y + h - ti, t, t),
        }
    }
}
