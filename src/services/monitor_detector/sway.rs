use crate::error::{LeadError, Result};
use crate::events::{Monitor, Rect};
use serde::Deserialize;
use std::process::Command;

use super::r#trait::MonitorSource;

#[derive(Debug, Deserialize)]
struct SwayOutput {
    name: String,
    #[serde(default)]
    active: bool,
    rect: SwayRect,
}

#[derive(Debug, Deserialize)]
struct SwayRect {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

/// Мониторы sway через `swaymsg -t get_outputs -r`
pub struct SwayMonitorSource;

impl SwayMonitorSource {
    pub fn new() -> Self {
        Self
    }

    /// Неактивные выходы пропускаются
    pub fn parse_outputs(json: &str) -> Result<Vec<Monitor>> {
        let outputs: Vec<SwayOutput> = serde_json::from_str(json)
            .map_err(|e| LeadError::MonitorEnumeration(format!("некорректный ответ swaymsg: {}", e)))?;

        Ok(outputs
            .into_iter()
            .filter(|output| output.active)
            .map(|output| {
                let rect = output.rect;
                Monitor::new(output.name, Rect::new(rect.x, rect.y, rect.width, rect.height))
            })
            .collect())
    }
}

impl MonitorSource for SwayMonitorSource {
    fn enumerate(&self) -> Result<Vec<Monitor>> {
        let output = Command::new("swaymsg")
            .args(["-t", "get_outputs", "-r"])
            .output()
            .map_err(|e| LeadError::MonitorEnumeration(format!("swaymsg не найден: {}", e)))?;

        if !output.status.success() {
            return LeadError::monitor_enumeration("swaymsg вернул ошибку");
        }

        Self::parse_outputs(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_outputs_skips_inactive() {
        let json = r#"[
            {"name": "eDP-1", "active": true, "rect": {"x": 0, "y": 0, "width": 1920, "height": 1200}},
            {"name": "HDMI-A-1", "active": false, "rect": {"x": 0, "y": 0, "width": 0, "height": 0}},
            {"name": "DP-3", "active": true, "rect": {"x": 1920, "y": -120, "width": 2560, "height": 1440}}
        ]"#;

        let monitors = SwayMonitorSource::parse_outputs(json).unwrap();

        assert_eq!(
            monitors,
            vec![
                Monitor::new("eDP-1", Rect::new(0, 0, 1920, 1200)),
                Monitor::new("DP-3", Rect::new(1920, -120, 2560, 1440)),
            ]
        );
    }

    #[test]
    fn test_parse_outputs_rejects_garbage() {
        assert!(SwayMonitorSource::parse_outputs("not json").is_err());
    }
}
